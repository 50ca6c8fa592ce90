//! Sequencing of package-manager invocations for a selection

use super::command::UpdateBatches;
use crate::config::RunContext;
use crate::domain::{PackageManagerKind, PackageRecord};
use crate::error::InstallError;
use async_trait::async_trait;
use std::path::Path;

/// Runs one package-manager invocation to completion
#[async_trait]
pub trait InstallRunner: Send + Sync {
    /// Run `manager args...` in `working_dir`
    async fn run(
        &self,
        manager: PackageManagerKind,
        args: &[String],
        working_dir: &Path,
    ) -> Result<(), InstallError>;
}

/// Section a batch is persisted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// dependencies
    Production,
    /// devDependencies
    Development,
}

/// Where an update run is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateState {
    /// Nothing done yet
    Idle,
    /// Batches computed
    SpecifiersBuilt,
    /// Production batch running
    InstallingProd,
    /// Development batch running
    InstallingDev,
    /// Every batch installed
    Done,
    /// A batch failed; later batches were not attempted
    Failed,
}

/// Result of a successful update run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing was selected; no process was started
    NoOp,
    /// Specifiers that were installed
    Updated {
        /// Production first, then development
        specifiers: Vec<String>,
    },
}

/// Save flags for a batch; none in global mode
pub fn persistence_flags(
    manager: PackageManagerKind,
    kind: BatchKind,
    global: bool,
) -> Vec<&'static str> {
    if global {
        return Vec::new();
    }
    match (manager, kind) {
        (PackageManagerKind::Yarn, BatchKind::Production) => Vec::new(),
        (PackageManagerKind::Yarn, BatchKind::Development) => vec!["--dev"],
        (_, BatchKind::Production) => vec!["--save"],
        (_, BatchKind::Development) => vec!["--save-dev"],
    }
}

/// Full argument list for one batch
pub fn install_args(ctx: &RunContext, kind: BatchKind, batch: &[String]) -> Vec<String> {
    let manager = ctx.package_manager;
    let mut args: Vec<String> = Vec::new();

    match manager {
        PackageManagerKind::Yarn => {
            if ctx.global {
                args.push("global".to_string());
            }
            args.push("add".to_string());
            if ctx.save_exact {
                args.push("--exact".to_string());
            }
        }
        PackageManagerKind::Npm | PackageManagerKind::Pnpm => {
            args.push("install".to_string());
            if ctx.global {
                args.push("--global".to_string());
            }
            if ctx.save_exact {
                args.push("--save-exact".to_string());
            }
            if ctx.legacy_peer_deps {
                args.push("--legacy-peer-deps".to_string());
            }
        }
    }

    args.extend(
        persistence_flags(manager, kind, ctx.global)
            .into_iter()
            .map(str::to_string),
    );
    args.extend(batch.iter().cloned());
    args
}

/// Applies a selection by invoking the package manager once per non-empty batch
pub struct UpdateOrchestrator<'a> {
    ctx: &'a RunContext,
    runner: &'a dyn InstallRunner,
    state: UpdateState,
}

impl<'a> UpdateOrchestrator<'a> {
    /// Create an orchestrator in the `Idle` state
    pub fn new(ctx: &'a RunContext, runner: &'a dyn InstallRunner) -> Self {
        Self {
            ctx,
            runner,
            state: UpdateState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &UpdateState {
        &self.state
    }

    fn transition(&mut self, next: UpdateState) {
        tracing::debug!(from = ?self.state, to = ?next, "update state");
        self.state = next;
    }

    async fn install(&mut self, kind: BatchKind, batch: &[String]) -> Result<(), InstallError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.transition(match kind {
            BatchKind::Production => UpdateState::InstallingProd,
            BatchKind::Development => UpdateState::InstallingDev,
        });

        let args = install_args(self.ctx, kind, batch);
        tracing::info!(manager = %self.ctx.package_manager, args = ?args, "running installer");
        let working_dir = self.ctx.project_dir.as_path();
        if let Err(e) = self
            .runner
            .run(self.ctx.package_manager, &args, working_dir)
            .await
        {
            self.transition(UpdateState::Failed);
            return Err(e);
        }
        Ok(())
    }

    /// Install the selected records: production batch first, development
    /// batch only if the first succeeded
    pub async fn apply(
        &mut self,
        selected: &[&PackageRecord],
    ) -> Result<UpdateOutcome, InstallError> {
        let batches =
            UpdateBatches::from_selection(selected, self.ctx.package_manager, self.ctx.save_exact);
        if batches.is_empty() {
            self.transition(UpdateState::Done);
            return Ok(UpdateOutcome::NoOp);
        }
        self.transition(UpdateState::SpecifiersBuilt);

        self.install(BatchKind::Production, &batches.production)
            .await?;
        self.install(BatchKind::Development, &batches.development)
            .await?;

        self.transition(UpdateState::Done);
        Ok(UpdateOutcome::Updated {
            specifiers: batches.all(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<Vec<String>>>,
        fail_first: bool,
    }

    #[async_trait]
    impl InstallRunner for RecordingRunner {
        async fn run(
            &self,
            manager: PackageManagerKind,
            args: &[String],
            _working_dir: &Path,
        ) -> Result<(), InstallError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(args.to_vec());
            if self.fail_first && calls.len() == 1 {
                return Err(InstallError::ExitStatus {
                    manager,
                    args: args.to_vec(),
                    status: "exit status: 1".to_string(),
                });
            }
            Ok(())
        }
    }

    fn record(name: &str, latest: &str, dev: bool) -> PackageRecord {
        let mut r = PackageRecord::new(name, true);
        r.latest = Some(latest.to_string());
        r.is_dev_dependency = dev;
        r
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_persistence_flags() {
        use BatchKind::*;
        use PackageManagerKind::*;
        assert!(persistence_flags(Yarn, Production, false).is_empty());
        assert_eq!(persistence_flags(Yarn, Development, false), vec!["--dev"]);
        assert_eq!(persistence_flags(Npm, Production, false), vec!["--save"]);
        assert_eq!(persistence_flags(Pnpm, Development, false), vec!["--save-dev"]);
        assert!(persistence_flags(Npm, Development, true).is_empty());
    }

    #[test]
    fn test_install_args_npm() {
        let ctx = RunContext::new("/p").with_save_exact(true);
        assert_eq!(
            install_args(&ctx, BatchKind::Production, &strings(&["a@1.0.0"])),
            strings(&["install", "--save-exact", "--save", "a@1.0.0"])
        );
    }

    #[test]
    fn test_install_args_npm_global_legacy_peer_deps() {
        let mut ctx = RunContext::new("/p").with_global(true);
        ctx.legacy_peer_deps = true;
        assert_eq!(
            install_args(&ctx, BatchKind::Production, &strings(&["typescript@5.3.3"])),
            strings(&["install", "--global", "--legacy-peer-deps", "typescript@5.3.3"])
        );
    }

    #[test]
    fn test_install_args_yarn() {
        let ctx = RunContext::new("/p").with_package_manager(PackageManagerKind::Yarn);
        assert_eq!(
            install_args(&ctx, BatchKind::Development, &strings(&["jest@^29.0.0"])),
            strings(&["add", "--dev", "jest@^29.0.0"])
        );

        let ctx = ctx.with_global(true).with_save_exact(true);
        assert_eq!(
            install_args(&ctx, BatchKind::Production, &strings(&["serve@14.0.0"])),
            strings(&["global", "add", "--exact", "serve@14.0.0"])
        );
    }

    #[tokio::test]
    async fn test_zero_selections_is_noop() {
        let ctx = RunContext::new("/p");
        let runner = RecordingRunner::default();
        let mut orchestrator = UpdateOrchestrator::new(&ctx, &runner);

        let outcome = orchestrator.apply(&[]).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NoOp);
        assert_eq!(orchestrator.state(), &UpdateState::Done);
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_production_then_development() {
        let ctx = RunContext::new("/p");
        let runner = RecordingRunner::default();
        let a = record("a", "1.1.0", false);
        let jest = record("jest", "29.0.0", true);

        let mut orchestrator = UpdateOrchestrator::new(&ctx, &runner);
        let outcome = orchestrator.apply(&[&jest, &a]).await.unwrap();

        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                specifiers: strings(&["a@1.1.0", "jest@29.0.0"])
            }
        );
        assert_eq!(orchestrator.state(), &UpdateState::Done);
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], strings(&["install", "--save", "a@1.1.0"]));
        assert_eq!(calls[1], strings(&["install", "--save-dev", "jest@29.0.0"]));
    }

    #[tokio::test]
    async fn test_only_development_batch() {
        let ctx = RunContext::new("/p");
        let runner = RecordingRunner::default();
        let jest = record("jest", "29.0.0", true);

        let mut orchestrator = UpdateOrchestrator::new(&ctx, &runner);
        orchestrator.apply(&[&jest]).await.unwrap();
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_production_failure_skips_development() {
        let ctx = RunContext::new("/p");
        let runner = RecordingRunner {
            fail_first: true,
            ..RecordingRunner::default()
        };
        let a = record("a", "1.1.0", false);
        let jest = record("jest", "29.0.0", true);

        let mut orchestrator = UpdateOrchestrator::new(&ctx, &runner);
        let err = orchestrator.apply(&[&a, &jest]).await.unwrap_err();

        assert!(matches!(err, InstallError::ExitStatus { .. }));
        assert_eq!(orchestrator.state(), &UpdateState::Failed);
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }
}
