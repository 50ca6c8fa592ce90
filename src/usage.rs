//! Unused and undeclared dependency facts from an external usage analyzer
//!
//! The report format is the JSON emitted by `depcheck --json`:
//! `{"dependencies": [..], "devDependencies": [..], "missing": {"name": ["/abs/file.js"]}}`

use crate::error::UsageError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Precomputed usage analysis for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UsageReport {
    /// Declared production dependencies that are never required
    #[serde(default, rename = "dependencies")]
    unused_dependencies: BTreeSet<String>,
    /// Declared development dependencies that are never required
    #[serde(default, rename = "devDependencies")]
    unused_dev_dependencies: BTreeSet<String>,
    /// Required but undeclared packages, with the files requiring them
    #[serde(default)]
    missing: BTreeMap<String, Vec<String>>,
}

impl UsageReport {
    /// Build a report directly
    pub fn new(unused: BTreeSet<String>, missing: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            unused_dependencies: unused,
            unused_dev_dependencies: BTreeSet::new(),
            missing,
        }
    }

    /// Load a `depcheck --json` report
    pub fn load(path: &Path) -> Result<Self, UsageError> {
        let content = std::fs::read_to_string(path).map_err(|e| UsageError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| UsageError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Returns true if the analyzer flagged the package as unused
    pub fn is_unused(&self, name: &str) -> bool {
        self.unused_dependencies.contains(name) || self.unused_dev_dependencies.contains(name)
    }

    /// Files requiring the package without it being declared
    pub fn missing_files(&self, name: &str) -> Option<&[String]> {
        self.missing.get(name).map(Vec::as_slice)
    }

    /// Names required but undeclared, sorted
    pub fn missing_names(&self) -> impl Iterator<Item = &str> {
        self.missing.keys().map(String::as_str)
    }
}
