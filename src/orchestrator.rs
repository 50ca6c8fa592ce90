//! Run orchestrator coordinating the audit workflow
//!
//! This module provides:
//! - Workflow coordination: load → discover → analyze → select → update
//! - Project and global mode input loading
//! - Bounded concurrent registry lookups with progress display

use crate::check::{analyze, candidate_names, AnalysisResult, PackageRecordBuilder};
use crate::cli::CliArgs;
use crate::config::RunContext;
use crate::error::AppError;
use crate::manifest::{ModuleLocator, PackageJson};
use crate::package_manager::global_root;
use crate::progress::Progress;
use crate::registry::{HttpClient, NpmRegistry, RegistryLookup};
use crate::update::{group_records, InstallRunner, SelectionStrategy, UpdateOrchestrator, UpdateOutcome};
use crate::usage::UsageReport;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything read from disk before analysis starts
struct RunInputs {
    project: PackageJson,
    global_packages: BTreeMap<String, String>,
    usage: UsageReport,
    locator: ModuleLocator,
}

/// Orchestrator for one audit run
pub struct Orchestrator {
    /// Resolved configuration
    ctx: RunContext,
    /// Optional `depcheck --json` report
    usage_report: Option<PathBuf>,
    /// Explicit global node_modules directory (otherwise asked from the manager)
    global_root: Option<PathBuf>,
    /// Whether to draw progress bars
    show_progress: bool,
}

impl Orchestrator {
    /// Create an orchestrator from CLI arguments
    pub fn new(args: &CliArgs) -> Result<Self, AppError> {
        let ctx = RunContext::from_args(args)?;
        Ok(Self {
            ctx,
            usage_report: args.usage_report.clone(),
            global_root: None,
            show_progress: args.show_progress(),
        })
    }

    /// Create an orchestrator from an already resolved context
    pub fn from_context(ctx: RunContext) -> Self {
        Self {
            ctx,
            usage_report: None,
            global_root: None,
            show_progress: false,
        }
    }

    /// Use a usage report
    pub fn with_usage_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.usage_report = Some(path.into());
        self
    }

    /// Use a fixed global node_modules directory
    pub fn with_global_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.global_root = Some(root.into());
        self
    }

    /// The resolved run configuration
    pub fn context(&self) -> &RunContext {
        &self.ctx
    }

    /// npm registry client for the configured registry URL
    pub fn default_registry(&self) -> Result<NpmRegistry, AppError> {
        let client = HttpClient::new()?;
        Ok(NpmRegistry::with_base_url(client, &self.ctx.registry_url))
    }

    async fn load_inputs(&self) -> Result<RunInputs, AppError> {
        let usage = match &self.usage_report {
            Some(path) => UsageReport::load(path)?,
            None => UsageReport::default(),
        };

        if self.ctx.global {
            let root = match &self.global_root {
                Some(root) => root.clone(),
                None => global_root(self.ctx.package_manager).await?,
            };
            let locator = ModuleLocator::new(root);
            let global_packages = locator.list_installed().into_iter().collect();
            return Ok(RunInputs {
                project: PackageJson::default(),
                global_packages,
                usage,
                locator,
            });
        }

        let project = PackageJson::read(&self.ctx.project_dir.join("package.json"))?;
        tracing::debug!(
            dependencies = project.dependencies.len(),
            dev_dependencies = project.dev_dependencies.len(),
            "read project manifest"
        );
        Ok(RunInputs {
            project,
            global_packages: BTreeMap::new(),
            usage,
            locator: ModuleLocator::for_project(&self.ctx.project_dir),
        })
    }

    /// Analyze every candidate package against the registry
    pub async fn analyze(&self, registry: &dyn RegistryLookup) -> Result<AnalysisResult, AppError> {
        let mut progress = Progress::new(self.show_progress);
        progress.loading("Reading installed packages");
        let inputs = self.load_inputs().await?;

        let builder = PackageRecordBuilder::new(
            &self.ctx,
            &inputs.project,
            &inputs.global_packages,
            &inputs.usage,
            &inputs.locator,
        );
        let candidates = candidate_names(
            &self.ctx,
            &inputs.project,
            &inputs.global_packages,
            &inputs.usage,
        );

        progress.lookups(candidates.len());
        let result = analyze(&builder, registry, &candidates, &progress).await;
        progress.clear();

        tracing::info!(
            packages = result.packages.len(),
            errors = result.errors.len(),
            "analysis complete"
        );
        Ok(result)
    }

    /// Let the strategy pick from the update groups and install the picks
    pub async fn update(
        &self,
        result: &AnalysisResult,
        strategy: &mut dyn SelectionStrategy,
        runner: &dyn InstallRunner,
    ) -> Result<UpdateOutcome, AppError> {
        let groups = group_records(&result.packages);
        let selected = strategy.select(&groups).map_err(AppError::Prompt)?;
        tracing::info!(selected = selected.len(), "packages selected for update");

        let mut orchestrator = UpdateOrchestrator::new(&self.ctx, runner);
        Ok(orchestrator.apply(&selected).await?)
    }
}
