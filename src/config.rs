//! Run configuration
//!
//! Layering, lowest to highest priority:
//! - built-in defaults
//! - `.depauditrc.toml` in the project directory
//! - command-line flags and environment variables
//!
//! The result is a `RunContext` that is built once and only read afterwards.

use crate::cli::CliArgs;
use crate::domain::PackageManagerKind;
use crate::error::ConfigError;
use crate::registry::DEFAULT_REGISTRY_URL;
use glob::{MatchOptions, Pattern};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file name looked up in the project directory
pub const CONFIG_FILE_NAME: &str = ".depauditrc.toml";

/// Which declared dependency sections to audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyFilter {
    /// dependencies and devDependencies
    #[default]
    All,
    /// dependencies only
    ProductionOnly,
    /// devDependencies only
    DevOnly,
}

impl DependencyFilter {
    /// Whether `dependencies` are audited
    pub fn includes_production(&self) -> bool {
        !matches!(self, DependencyFilter::DevOnly)
    }

    /// Whether `devDependencies` are audited
    pub fn includes_dev(&self) -> bool {
        !matches!(self, DependencyFilter::ProductionOnly)
    }
}

/// Glob patterns for package names to leave out of the audit
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<Pattern>,
}

impl IgnorePatterns {
    /// Compile patterns; invalid ones are logged and match nothing
    pub fn new<S: AsRef<str>>(raw: &[S]) -> Self {
        let patterns = raw
            .iter()
            .filter_map(|p| match Pattern::new(p.as_ref()) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    tracing::warn!(pattern = p.as_ref(), error = %e, "ignoring invalid ignore pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Returns true if any pattern matches. `*` does not cross the `/` of a scope.
    pub fn matches(&self, name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(name, options))
    }

    /// Returns true if there are no usable patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// `ignore` may be a single glob or a list of globs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single pattern
    One(String),
    /// Several patterns
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(pattern) => vec![pattern],
            OneOrMany::Many(patterns) => patterns,
        }
    }
}

/// Contents of `.depauditrc.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileConfig {
    /// Ignore pattern(s)
    #[serde(default)]
    pub ignore: Option<OneOrMany>,
    /// Save exact versions
    #[serde(default)]
    pub save_exact: Option<bool>,
    /// Package manager name
    #[serde(default)]
    pub installer: Option<String>,
    /// Pass --legacy-peer-deps
    #[serde(default)]
    pub legacy_peer_deps: Option<bool>,
    /// Registry base URL
    #[serde(default)]
    pub registry: Option<String>,
}

impl FileConfig {
    /// Parse config file content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `.depauditrc.toml` from a directory; a missing file yields defaults
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(&content, &path)
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Project root (where package.json lives)
    pub project_dir: PathBuf,
    /// Audit globally installed packages instead of a project
    pub global: bool,
    /// Packages to leave out
    pub ignore: IgnorePatterns,
    /// Install exact versions
    pub save_exact: bool,
    /// Declared sections to audit
    pub dependency_filter: DependencyFilter,
    /// Package manager that applies updates
    pub package_manager: PackageManagerKind,
    /// Pass --legacy-peer-deps to npm
    pub legacy_peer_deps: bool,
    /// Registry base URL
    pub registry_url: String,
}

impl RunContext {
    /// Context with defaults for a project directory
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            global: false,
            ignore: IgnorePatterns::default(),
            save_exact: false,
            dependency_filter: DependencyFilter::All,
            package_manager: PackageManagerKind::Npm,
            legacy_peer_deps: false,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
        }
    }

    /// Set global mode
    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Set ignore patterns
    pub fn with_ignore<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        self.ignore = IgnorePatterns::new(patterns);
        self
    }

    /// Set exact-pin mode
    pub fn with_save_exact(mut self, save_exact: bool) -> Self {
        self.save_exact = save_exact;
        self
    }

    /// Set the dependency filter
    pub fn with_dependency_filter(mut self, filter: DependencyFilter) -> Self {
        self.dependency_filter = filter;
        self
    }

    /// Set the package manager
    pub fn with_package_manager(mut self, manager: PackageManagerKind) -> Self {
        self.package_manager = manager;
        self
    }

    /// Resolve the full context from CLI arguments and the project's config file
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.production && args.dev_only {
            return Err(ConfigError::ConflictingOptions {
                message: "--production and --dev-only cannot be used together".to_string(),
            });
        }

        let file = FileConfig::load(&args.path)?;
        Self::resolve(args, file)
    }

    /// Merge CLI arguments over file configuration
    pub fn resolve(args: &CliArgs, file: FileConfig) -> Result<Self, ConfigError> {
        let mut ignore = file.ignore.map(OneOrMany::into_vec).unwrap_or_default();
        ignore.extend(args.ignore.iter().cloned());

        let installer = args
            .installer
            .clone()
            .or(file.installer)
            .unwrap_or_else(|| "auto".to_string());
        let package_manager = if installer.trim().eq_ignore_ascii_case("auto") {
            PackageManagerKind::detect(&args.path)
        } else {
            installer.parse()?
        };

        let dependency_filter = if args.production {
            DependencyFilter::ProductionOnly
        } else if args.dev_only {
            DependencyFilter::DevOnly
        } else {
            DependencyFilter::All
        };

        Ok(Self {
            project_dir: args
                .path
                .canonicalize()
                .unwrap_or_else(|_| args.path.clone()),
            global: args.global,
            ignore: IgnorePatterns::new(&ignore),
            save_exact: args.save_exact || file.save_exact.unwrap_or(false),
            dependency_filter,
            package_manager,
            legacy_peer_deps: args.legacy_peer_deps || file.legacy_peer_deps.unwrap_or(false),
            registry_url: args
                .registry
                .clone()
                .or(file.registry)
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["depaudit"];
        argv.extend(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_ignore_single_pattern() {
        let ignore = IgnorePatterns::new(&["left-pad"]);
        assert!(ignore.matches("left-pad"));
        assert!(!ignore.matches("right-pad"));
    }

    #[test]
    fn test_ignore_match_any() {
        let ignore = IgnorePatterns::new(&["eslint*", "@types/*"]);
        assert!(ignore.matches("eslint"));
        assert!(ignore.matches("eslint-plugin-react"));
        assert!(ignore.matches("@types/node"));
        assert!(!ignore.matches("react"));
    }

    #[test]
    fn test_ignore_star_does_not_cross_scope() {
        let ignore = IgnorePatterns::new(&["@types*"]);
        assert!(!ignore.matches("@types/node"));
    }

    #[test]
    fn test_ignore_invalid_pattern_matches_nothing() {
        let ignore = IgnorePatterns::new(&["[unclosed"]);
        assert!(ignore.is_empty());
        assert!(!ignore.matches("[unclosed"));
    }

    #[test]
    fn test_dependency_filter() {
        assert!(DependencyFilter::All.includes_production());
        assert!(DependencyFilter::All.includes_dev());
        assert!(!DependencyFilter::ProductionOnly.includes_dev());
        assert!(!DependencyFilter::DevOnly.includes_production());
    }

    #[test]
    fn test_file_config_ignore_string_or_list() {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        let single = FileConfig::parse(r#"ignore = "left-pad""#, &path).unwrap();
        assert_eq!(single.ignore, Some(OneOrMany::One("left-pad".to_string())));

        let many = FileConfig::parse(r#"ignore = ["a", "b*"]"#, &path).unwrap();
        assert_eq!(
            many.ignore,
            Some(OneOrMany::Many(vec!["a".to_string(), "b*".to_string()]))
        );
    }

    #[test]
    fn test_file_config_invalid() {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        let err = FileConfig::parse("ignore = [", &path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_file_config_missing_file_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert_eq!(FileConfig::load(temp_dir.path()).unwrap(), FileConfig::default());
    }

    #[test]
    fn test_resolve_merges_file_and_cli() {
        let file = FileConfig {
            ignore: Some(OneOrMany::One("from-file".to_string())),
            save_exact: Some(true),
            installer: Some("yarn".to_string()),
            legacy_peer_deps: None,
            registry: Some("http://mirror.local".to_string()),
        };
        let ctx = RunContext::resolve(&args(&["-i", "from-cli", "-p"]), file).unwrap();

        assert!(ctx.ignore.matches("from-file"));
        assert!(ctx.ignore.matches("from-cli"));
        assert!(ctx.save_exact);
        assert_eq!(ctx.package_manager, PackageManagerKind::Yarn);
        assert_eq!(ctx.dependency_filter, DependencyFilter::ProductionOnly);
        assert_eq!(ctx.registry_url, "http://mirror.local");
    }

    #[test]
    fn test_resolve_cli_installer_wins() {
        let file = FileConfig {
            installer: Some("yarn".to_string()),
            ..FileConfig::default()
        };
        let ctx = RunContext::resolve(&args(&["--installer", "pnpm"]), file).unwrap();
        assert_eq!(ctx.package_manager, PackageManagerKind::Pnpm);
    }

    #[test]
    fn test_resolve_auto_installer_detects_lockfile() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let ctx =
            RunContext::resolve(&args(&[path, "--installer", "auto"]), FileConfig::default())
                .unwrap();
        assert_eq!(ctx.package_manager, PackageManagerKind::Yarn);
    }

    #[test]
    fn test_resolve_invalid_installer() {
        let err = RunContext::resolve(&args(&["--installer", "bun"]), FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInstaller { .. }));
    }

    #[test]
    fn test_from_args_rejects_production_and_dev_only() {
        let err = RunContext::from_args(&args(&["-p", "-d"])).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingOptions { .. }));
    }

    #[test]
    fn test_from_args_reads_config_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "save_exact = true\ninstaller = \"npm\"\n",
        )
        .unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let ctx = RunContext::from_args(&args(&[path])).unwrap();
        assert!(ctx.save_exact);
        assert_eq!(ctx.package_manager, PackageManagerKind::Npm);
    }

    #[test]
    fn test_new_defaults() {
        let ctx = RunContext::new("/project");
        assert!(!ctx.global);
        assert!(!ctx.save_exact);
        assert!(ctx.ignore.is_empty());
        assert_eq!(ctx.registry_url, DEFAULT_REGISTRY_URL);
    }
}
