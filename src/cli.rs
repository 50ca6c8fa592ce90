//! CLI argument parsing module for depaudit

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Audit npm dependencies and update them
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depaudit",
    version,
    about = "Check for outdated, incorrect, and unused dependencies"
)]
pub struct CliArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // Update modes
    /// Interactive update: choose which packages to update
    #[arg(short = 'u', long, conflicts_with = "update_all")]
    pub update: bool,

    /// Non-interactive update: apply every eligible update without prompting
    #[arg(short = 'y', long)]
    pub update_all: bool,

    // Scope
    /// Look at globally installed packages
    #[arg(short = 'g', long)]
    pub global: bool,

    /// Skip devDependencies
    #[arg(short = 'p', long)]
    pub production: bool,

    /// Look at devDependencies only (skip dependencies)
    #[arg(short = 'd', long)]
    pub dev_only: bool,

    /// Ignore packages matching a glob (can be specified multiple times)
    #[arg(short = 'i', long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    // Install options
    /// Save exact version (x.y.z) instead of caret (^x.y.z) in package.json
    #[arg(short = 'E', long)]
    pub save_exact: bool,

    /// Pass --legacy-peer-deps to the package manager
    #[arg(short = 'l', long)]
    pub legacy_peer_deps: bool,

    /// Package manager used for updates: auto, npm, yarn or pnpm
    #[arg(long, env = "DEPAUDIT_INSTALLER")]
    pub installer: Option<String>,

    /// Registry base URL
    #[arg(long, env = "DEPAUDIT_REGISTRY")]
    pub registry: Option<String>,

    /// Unused/missing report produced by `depcheck --json`
    #[arg(long, value_name = "FILE")]
    pub usage_report: Option<PathBuf>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Show debug output
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    /// Returns true if an update flow was requested
    pub fn wants_update(&self) -> bool {
        self.update || self.update_all
    }

    /// Returns true if progress spinners should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["depaudit"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(!args.update);
        assert!(!args.update_all);
        assert!(!args.global);
        assert!(!args.production);
        assert!(!args.dev_only);
        assert!(args.ignore.is_empty());
        assert!(!args.save_exact);
        assert!(!args.legacy_peer_deps);
        assert!(args.usage_report.is_none());
        assert!(!args.json);
        assert!(!args.wants_update());
        assert!(args.show_progress());
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["depaudit", "/some/path"]);
        assert_eq!(args.path, PathBuf::from("/some/path"));
    }

    #[test]
    fn test_update_flags() {
        let args = CliArgs::parse_from(["depaudit", "-u"]);
        assert!(args.update);
        assert!(args.wants_update());

        let args = CliArgs::parse_from(["depaudit", "--update-all"]);
        assert!(args.update_all);
        assert!(args.wants_update());
    }

    #[test]
    fn test_update_modes_conflict() {
        let result = CliArgs::try_parse_from(["depaudit", "-u", "-y"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_combined_short_flags() {
        let args = CliArgs::parse_from(["depaudit", "-gu"]);
        assert!(args.global);
        assert!(args.update);
    }

    #[test]
    fn test_ignore_multiple() {
        let args = CliArgs::parse_from(["depaudit", "-i", "@types/*", "--ignore", "eslint*"]);
        assert_eq!(args.ignore, vec!["@types/*", "eslint*"]);
    }

    #[test]
    fn test_save_exact_short_flag() {
        let args = CliArgs::parse_from(["depaudit", "-E"]);
        assert!(args.save_exact);
    }

    #[test]
    fn test_installer_flag() {
        let args = CliArgs::parse_from(["depaudit", "--installer", "yarn"]);
        assert_eq!(args.installer.as_deref(), Some("yarn"));
    }

    #[test]
    fn test_json_disables_progress() {
        let args = CliArgs::parse_from(["depaudit", "--json"]);
        assert!(!args.show_progress());

        let args = CliArgs::parse_from(["depaudit", "-q"]);
        assert!(!args.show_progress());
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "depaudit",
            "/path/to/project",
            "-y",
            "-p",
            "-E",
            "--usage-report",
            "depcheck.json",
            "--registry",
            "http://localhost:4873",
        ]);
        assert_eq!(args.path, PathBuf::from("/path/to/project"));
        assert!(args.update_all);
        assert!(args.production);
        assert!(args.save_exact);
        assert_eq!(args.usage_report, Some(PathBuf::from("depcheck.json")));
        assert_eq!(args.registry.as_deref(), Some("http://localhost:4873"));
    }
}
