//! package.json reader for Node.js projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - scripts
//! - version / private flags of installed packages
//!
//! Entries keep their declaration order.

use crate::error::ManifestError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::path::Path;

/// The parts of a package.json the audit reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    /// Package name
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
    /// Package version
    #[serde(default, deserialize_with = "string_or_none")]
    pub version: Option<String>,
    /// `private` flag, JavaScript truthiness
    #[serde(default, deserialize_with = "truthy")]
    pub private: bool,
    /// Production dependencies in declaration order
    #[serde(default, deserialize_with = "string_entries")]
    pub dependencies: Vec<(String, String)>,
    /// Development dependencies in declaration order
    #[serde(default, deserialize_with = "string_entries")]
    pub dev_dependencies: Vec<(String, String)>,
    /// npm scripts in declaration order
    #[serde(default, deserialize_with = "string_entries")]
    pub scripts: Vec<(String, String)>,
}

impl PackageJson {
    /// Parse package.json content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(content).map_err(|e| ManifestError::invalid(path, e.to_string()))
    }

    /// Read and parse a package.json file
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::from_io(path, &e))?;
        Self::parse(&content, path)
    }

    /// Range declared under `dependencies`
    pub fn dependency(&self, name: &str) -> Option<&str> {
        lookup(&self.dependencies, name)
    }

    /// Range declared under `devDependencies`
    pub fn dev_dependency(&self, name: &str) -> Option<&str> {
        lookup(&self.dev_dependencies, name)
    }

    /// Declared range, production entries taking precedence
    pub fn declared_range(&self, name: &str) -> Option<&str> {
        self.dependency(name).or_else(|| self.dev_dependency(name))
    }

    /// Returns true if the package is declared under `devDependencies`
    pub fn is_dev_dependency(&self, name: &str) -> bool {
        self.dev_dependency(name).is_some()
    }

    /// Name of the first script whose command line contains `needle`
    pub fn script_mentioning(&self, needle: &str) -> Option<&str> {
        self.scripts
            .iter()
            .find(|(_, script)| script.contains(needle))
            .map(|(name, _)| name.as_str())
    }
}

fn lookup<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Object of string values; non-string values are dropped
fn string_entries<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let entries = match value {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    Ok(entries
        .into_iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
        .collect())
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> PackageJson {
        PackageJson::parse(content, &PathBuf::from("package.json")).unwrap()
    }

    #[test]
    fn test_parse_dependencies_in_declaration_order() {
        let pkg = parse(
            r#"{
                "dependencies": {
                    "zod": "^3.0.0",
                    "axios": "^1.0.0",
                    "lodash": "^4.17.21"
                }
            }"#,
        );
        let names: Vec<_> = pkg.dependencies.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zod", "axios", "lodash"]);
    }

    #[test]
    fn test_declared_range_prefers_dependencies() {
        let pkg = parse(
            r#"{
                "dependencies": {"react": "^18.2.0"},
                "devDependencies": {"react": "^17.0.0", "typescript": "^5.0.0"}
            }"#,
        );
        assert_eq!(pkg.declared_range("react"), Some("^18.2.0"));
        assert_eq!(pkg.declared_range("typescript"), Some("^5.0.0"));
        assert_eq!(pkg.declared_range("missing"), None);
        assert!(pkg.is_dev_dependency("typescript"));
        assert!(!pkg.is_dev_dependency("missing"));
    }

    #[test]
    fn test_empty_manifest_defaults() {
        let pkg = parse("{}");
        assert!(pkg.dependencies.is_empty());
        assert!(pkg.dev_dependencies.is_empty());
        assert!(pkg.scripts.is_empty());
        assert!(!pkg.private);
        assert!(pkg.version.is_none());
    }

    #[test]
    fn test_non_string_values_dropped() {
        let pkg = parse(r#"{"dependencies": {"a": "^1.0.0", "b": 3, "c": null}}"#);
        assert_eq!(pkg.dependencies, vec![("a".to_string(), "^1.0.0".to_string())]);
    }

    #[test]
    fn test_private_truthiness() {
        assert!(parse(r#"{"private": true}"#).private);
        assert!(parse(r#"{"private": "yes"}"#).private);
        assert!(!parse(r#"{"private": false}"#).private);
        assert!(!parse(r#"{"private": 0}"#).private);
        assert!(!parse(r#"{"private": ""}"#).private);
    }

    #[test]
    fn test_script_mentioning_first_match() {
        let pkg = parse(
            r#"{
                "scripts": {
                    "lint": "eslint .",
                    "test": "jest --coverage",
                    "ci": "npm run lint && jest"
                }
            }"#,
        );
        assert_eq!(pkg.script_mentioning("jest"), Some("test"));
        assert_eq!(pkg.script_mentioning("eslint"), Some("lint"));
        assert_eq!(pkg.script_mentioning("mocha"), None);
    }

    #[test]
    fn test_script_mentioning_is_substring_match() {
        let pkg = parse(r#"{"scripts": {"build": "tsc -p tsconfig.json"}}"#);
        assert_eq!(pkg.script_mentioning("ts"), Some("build"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = PackageJson::parse("{ nope", &PathBuf::from("/p/package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { .. }));
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = PackageJson::read(&temp_dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn test_read_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("package.json");
        std::fs::write(&path, r#"{"name": "x", "version": "1.2.3"}"#).unwrap();
        let pkg = PackageJson::read(&path).unwrap();
        assert_eq!(pkg.name.as_deref(), Some("x"));
        assert_eq!(pkg.version.as_deref(), Some("1.2.3"));
    }
}
