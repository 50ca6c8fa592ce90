//! Classified per-package audit record

use super::BumpClass;
use serde::{Deserialize, Serialize};

/// Everything known about one package after analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Package name, unique within a run
    pub module_name: String,
    /// Homepage reported by the registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Registry lookup failure for this package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_error: Option<String>,
    /// Failure reading the installed package's own package.json
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_error: Option<String>,

    /// Latest version known to the registry (possibly raised from another dist-tag)
    pub latest: Option<String>,
    /// Version in use: the installed version, or the wanted version when not installed
    pub installed: Option<String>,
    /// Whether the package directory exists
    pub is_installed: bool,
    /// Negation of `is_installed`
    pub not_installed: bool,
    /// Highest published version satisfying the declared range
    pub package_wanted: Option<String>,
    /// Range declared in package.json (or the installed version for globals)
    pub declared_range: Option<String>,

    /// Where the package is required without being declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_locations: Option<String>,

    /// Declared under devDependencies
    pub is_dev_dependency: bool,
    /// First package.json script that mentions the package
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_in_scripts: Option<String>,
    /// In-use version does not satisfy the declared range
    pub mismatch: bool,
    /// In-use version is valid semver
    pub semver_valid: bool,
    /// Latest satisfies the declared range and is not a major bump
    pub easy_upgrade: bool,
    /// Kind of update available
    pub bump: Option<BumpClass>,
    /// Reported unused by the usage analyzer
    pub unused: bool,
}

impl PackageRecord {
    /// Creates a record carrying only local facts; every classification is unset
    pub fn new(module_name: impl Into<String>, is_installed: bool) -> Self {
        Self {
            module_name: module_name.into(),
            homepage: None,
            registry_error: None,
            manifest_error: None,
            latest: None,
            installed: None,
            is_installed,
            not_installed: !is_installed,
            package_wanted: None,
            declared_range: None,
            missing_locations: None,
            is_dev_dependency: false,
            used_in_scripts: None,
            mismatch: false,
            semver_valid: false,
            easy_upgrade: false,
            bump: None,
            unused: false,
        }
    }

    /// Returns true if a registry or manifest diagnostic is attached
    pub fn has_error(&self) -> bool {
        self.registry_error.is_some() || self.manifest_error.is_some()
    }

    /// Returns true if this record can be picked for an update
    pub fn is_selectable(&self) -> bool {
        self.registry_error.is_none()
            && self.latest.is_some()
            && (self.mismatch || self.not_installed || self.bump.is_some())
    }

    /// Returns true if the record has anything worth reporting
    pub fn needs_attention(&self) -> bool {
        self.has_error()
            || self.is_selectable()
            || self.unused
            || self.missing_locations.is_some()
    }
}
