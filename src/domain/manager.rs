//! Package manager identities understood by the updater

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Package managers that can apply updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    /// npm (package-lock.json)
    Npm,
    /// Yarn (yarn.lock)
    Yarn,
    /// pnpm (pnpm-lock.yaml)
    Pnpm,
}

impl PackageManagerKind {
    /// Returns the executable name for this package manager
    pub fn program(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Yarn => "yarn",
            PackageManagerKind::Pnpm => "pnpm",
        }
    }

    /// Returns true when the manager saves exactly what it is given.
    ///
    /// Yarn writes `pkg@1.2.3` verbatim into package.json, so a caret has to
    /// be requested explicitly. npm and pnpm widen to `^1.2.3` on their own.
    pub fn is_caret_insensitive(&self) -> bool {
        matches!(self, PackageManagerKind::Yarn)
    }

    /// Detect the preferred package manager from lockfiles, defaulting to npm
    pub fn detect(project_dir: &Path) -> Self {
        if project_dir.join("pnpm-lock.yaml").exists() {
            return PackageManagerKind::Pnpm;
        }
        if project_dir.join("yarn.lock").exists() {
            return PackageManagerKind::Yarn;
        }
        PackageManagerKind::Npm
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

impl FromStr for PackageManagerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(PackageManagerKind::Npm),
            "yarn" => Ok(PackageManagerKind::Yarn),
            "pnpm" => Ok(PackageManagerKind::Pnpm),
            _ => Err(ConfigError::InvalidInstaller {
                value: s.to_string(),
            }),
        }
    }
}
