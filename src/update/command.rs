//! Install specifiers for selected records

use crate::domain::{PackageManagerKind, PackageRecord};

/// `name@version` (or `name@^version`) handed to the package manager
pub fn build_specifier(
    name: &str,
    version: &str,
    manager: PackageManagerKind,
    save_exact: bool,
) -> String {
    if manager.is_caret_insensitive() && !save_exact {
        format!("{}@^{}", name, version)
    } else {
        format!("{}@{}", name, version)
    }
}

/// Specifiers split by the section that persists them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatches {
    /// Installed as production dependencies
    pub production: Vec<String>,
    /// Installed as development dependencies
    pub development: Vec<String>,
}

impl UpdateBatches {
    /// Build specifiers for the selection, keeping its order within each batch.
    /// Records without a known latest version are skipped.
    pub fn from_selection(
        selected: &[&PackageRecord],
        manager: PackageManagerKind,
        save_exact: bool,
    ) -> Self {
        let mut batches = Self::default();
        for record in selected {
            let Some(latest) = record.latest.as_deref() else {
                tracing::debug!(package = %record.module_name, "no latest version, skipping");
                continue;
            };
            let specifier = build_specifier(&record.module_name, latest, manager, save_exact);
            if record.is_dev_dependency {
                batches.development.push(specifier);
            } else {
                batches.production.push(specifier);
            }
        }
        batches
    }

    /// Returns true if there is nothing to install
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.development.is_empty()
    }

    /// Every specifier, production first
    pub fn all(&self) -> Vec<String> {
        self.production
            .iter()
            .chain(self.development.iter())
            .cloned()
            .collect()
    }
}
