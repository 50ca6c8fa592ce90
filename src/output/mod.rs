//! Rendering of audit reports and update outcomes
//!
//! Two renderers share one trait: a grouped, optionally coloured text report
//! for terminals and a JSON document for scripts.

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::check::{AnalysisResult, PackageIssue};
use crate::cli::CliArgs;
use crate::update::UpdateOutcome;
use std::io::Write;

/// How much detail the text report carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Package lines only, no group headings
    Quiet,
    #[default]
    Normal,
    /// Adds homepage and declared range to every line
    Verbose,
}

impl Verbosity {
    /// `--quiet` takes precedence over `--verbose`
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Which renderer a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputConfig {
    Text { verbosity: Verbosity, color: bool },
    Json,
}

impl From<&CliArgs> for OutputConfig {
    fn from(args: &CliArgs) -> Self {
        if args.json {
            OutputConfig::Json
        } else {
            OutputConfig::Text {
                verbosity: Verbosity::from_flags(args.verbose, args.quiet),
                color: !args.no_color,
            }
        }
    }
}

/// A renderer for both halves of a run
pub trait OutputFormatter {
    /// Render the analysis report
    fn format(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()>;

    /// Render the package-level failures ahead of an update, before anything
    /// is selected
    fn format_errors(
        &self,
        errors: &[PackageIssue],
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;

    /// Render what an update run installed out of `result`
    fn format_outcome(
        &self,
        result: &AnalysisResult,
        outcome: &UpdateOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()>;
}

pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config {
        OutputConfig::Text { verbosity, color } => {
            Box::new(TextFormatter::with_color(verbosity, color))
        }
        OutputConfig::Json => Box::new(JsonFormatter::new()),
    }
}
