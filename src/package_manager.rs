//! Package manager processes
//!
//! This module provides:
//! - The system installer that runs npm, yarn or pnpm with inherited stdio
//! - Lookup of the global node_modules directory for each manager

use crate::domain::PackageManagerKind;
use crate::error::{ConfigError, InstallError};
use crate::update::InstallRunner;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs the real package manager executable
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInstaller;

impl SystemInstaller {
    /// Create a new system installer
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl InstallRunner for SystemInstaller {
    async fn run(
        &self,
        manager: PackageManagerKind,
        args: &[String],
        working_dir: &Path,
    ) -> Result<(), InstallError> {
        let status = Command::new(manager.program())
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| InstallError::Spawn { manager, source })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::ExitStatus {
                manager,
                args: args.to_vec(),
                status: status.to_string(),
            })
        }
    }
}

/// Arguments that make a manager print its global directory
fn global_dir_args(manager: PackageManagerKind) -> &'static [&'static str] {
    match manager {
        PackageManagerKind::Npm | PackageManagerKind::Pnpm => &["root", "-g"],
        PackageManagerKind::Yarn => &["global", "dir"],
    }
}

/// Turn the manager's output into the node_modules root.
/// `yarn global dir` prints the directory that contains node_modules.
fn parse_global_dir(manager: PackageManagerKind, stdout: &str) -> Option<PathBuf> {
    let line = stdout.lines().map(str::trim).rfind(|l| !l.is_empty())?;
    let dir = PathBuf::from(line);
    Some(match manager {
        PackageManagerKind::Yarn => dir.join("node_modules"),
        PackageManagerKind::Npm | PackageManagerKind::Pnpm => dir,
    })
}

/// Global node_modules directory for a manager
pub async fn global_root(manager: PackageManagerKind) -> Result<PathBuf, ConfigError> {
    let args = global_dir_args(manager);
    let output = Command::new(manager.program())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ConfigError::GlobalRoot {
            message: format!("failed to run {} {}: {}", manager, args.join(" "), e),
        })?;

    if !output.status.success() {
        return Err(ConfigError::GlobalRoot {
            message: format!(
                "{} {} exited with {}: {}",
                manager,
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let root = parse_global_dir(manager, &stdout).ok_or_else(|| ConfigError::GlobalRoot {
        message: format!("{} {} printed nothing", manager, args.join(" ")),
    })?;
    tracing::debug!(root = %root.display(), "global node_modules");
    Ok(root)
}
