//! Bump classification between an in-use and a latest version

use serde::{Deserialize, Serialize};
use std::fmt;

/// Magnitude of the difference between the version in use and the latest version
///
/// "No difference" is not a variant; callers hold an `Option<BumpClass>` and
/// use `None` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BumpClass {
    /// Backwards-compatible bug fixes
    Patch,
    /// New backwards-compatible features
    Minor,
    /// Potentially breaking API changes
    Major,
    /// Pre-release of the next major version
    Premajor,
    /// Pre-release of the next minor version
    Preminor,
    /// Pre-release of the next patch version
    Prepatch,
    /// Change within pre-release identifiers only
    Prerelease,
    /// Latest version is below 1.0.0, no compatibility guarantee
    NonSemver,
}

impl BumpClass {
    /// Returns the label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            BumpClass::Patch => "patch",
            BumpClass::Minor => "minor",
            BumpClass::Major => "major",
            BumpClass::Premajor => "premajor",
            BumpClass::Preminor => "preminor",
            BumpClass::Prepatch => "prepatch",
            BumpClass::Prerelease => "prerelease",
            BumpClass::NonSemver => "nonSemver",
        }
    }
}

impl fmt::Display for BumpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(BumpClass::Patch.label(), "patch");
        assert_eq!(BumpClass::NonSemver.label(), "nonSemver");
        assert_eq!(BumpClass::Premajor.to_string(), "premajor");
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_string(&BumpClass::NonSemver).unwrap();
        assert_eq!(json, "\"nonSemver\"");
        let json = serde_json::to_string(&BumpClass::Minor).unwrap();
        assert_eq!(json, "\"minor\"");
    }
}
