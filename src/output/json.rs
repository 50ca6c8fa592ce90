//! JSON output formatter for machine processing
//!
//! The report is `{"packages": [...], "errors": [...]}` with every analyzed
//! package, not only the ones needing attention.

use crate::check::{AnalysisResult, PackageIssue};
use crate::output::OutputFormatter;
use crate::update::UpdateOutcome;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of an update run
#[derive(Serialize)]
struct JsonOutcome<'a> {
    /// Installed specifiers, empty when nothing was selected
    updated: &'a [String],
    /// Packages that could not be checked and so were never offered
    errors: &'a [PackageIssue],
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        write_json(result, writer)
    }

    // Errors travel inside the outcome document so stdout stays one JSON value
    fn format_errors(
        &self,
        _errors: &[PackageIssue],
        _writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        Ok(())
    }

    fn format_outcome(
        &self,
        result: &AnalysisResult,
        outcome: &UpdateOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let updated: &[String] = match outcome {
            UpdateOutcome::NoOp => &[],
            UpdateOutcome::Updated { specifiers } => specifiers,
        };
        write_json(
            &JsonOutcome {
                updated,
                errors: &result.errors,
            },
            writer,
        )
    }
}
