//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Update groups in priority order with aligned version columns
//! - Notices for unused, undeclared and failed packages
//! - The all-clear message when nothing needs attention

use crate::check::{AnalysisResult, PackageIssue};
use crate::domain::{BumpClass, PackageRecord};
use crate::output::{OutputFormatter, Verbosity};
use crate::update::{group_records, GroupKind, UpdateOutcome};
use colored::{ColoredString, Colorize};
use std::io::Write;

/// Shown when no record needs attention
pub const ALL_CLEAR_MESSAGE: &str = "Your modules look amazing. Keep up the great work.";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn heading_color(kind: GroupKind, text: &str) -> ColoredString {
        match kind {
            GroupKind::Mismatch | GroupKind::Missing => text.yellow().bold(),
            GroupKind::Patch => text.green().bold(),
            GroupKind::Minor => text.cyan().bold(),
            GroupKind::Major | GroupKind::NonSemver | GroupKind::Prerelease => text.red().bold(),
        }
    }

    fn bump_label(&self, bump: Option<BumpClass>) -> String {
        let Some(bump) = bump else {
            return String::new();
        };
        let label = format!("[{}]", bump.label());
        if !self.color {
            return label;
        }
        match bump {
            BumpClass::Major => label.red().bold().to_string(),
            BumpClass::Minor => label.yellow().to_string(),
            BumpClass::Patch => label.green().to_string(),
            _ => label.magenta().to_string(),
        }
    }

    fn format_group_heading(&self, kind: GroupKind, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.color {
            writeln!(
                writer,
                "{} {}",
                Self::heading_color(kind, kind.title()),
                kind.description().dimmed()
            )
        } else {
            writeln!(writer, "{} {}", kind.title(), kind.description())
        }
    }

    fn format_record_line(
        &self,
        record: &PackageRecord,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let from = record.installed.as_deref().unwrap_or("-");
        let to = record.latest.as_deref().unwrap_or("-");
        let bump = self.bump_label(record.bump);
        let dev_marker = if record.is_dev_dependency { " (dev)" } else { "" };

        if self.color {
            let name_display = format!("{:width$}", record.module_name, width = max_name_len);
            writeln!(
                writer,
                "  {} {} {} {} {}{}",
                name_display,
                from.dimmed(),
                "→".dimmed(),
                to.bright_white().bold(),
                bump,
                dev_marker.dimmed()
            )?;
        } else {
            writeln!(
                writer,
                "  {:width$} {} -> {} {}{}",
                record.module_name,
                from,
                to,
                bump,
                dev_marker,
                width = max_name_len
            )?;
        }

        if self.verbosity == Verbosity::Verbose {
            if let Some(homepage) = &record.homepage {
                writeln!(writer, "  {:width$} {}", "", homepage, width = max_name_len)?;
            }
            if let Some(range) = &record.declared_range {
                writeln!(
                    writer,
                    "  {:width$} package.json wants {}",
                    "",
                    range,
                    width = max_name_len
                )?;
            }
        }
        Ok(())
    }

    /// Lines for things an update cannot fix
    fn notices(&self, record: &PackageRecord) -> Vec<String> {
        let name = &record.module_name;
        let mut notices = Vec::new();

        if let Some(error) = &record.registry_error {
            notices.push(format!("{}: {}", name, error));
        }
        if let Some(error) = &record.manifest_error {
            notices.push(format!("{}: {}", name, error));
        }
        if let Some(locations) = &record.missing_locations {
            notices.push(format!("{}: not in package.json. {}", name, locations));
        }
        if record.unused {
            let message = match &record.used_in_scripts {
                Some(script) => format!(
                    "{}: possibly unused, but mentioned in the \"{}\" script",
                    name, script
                ),
                None => format!("{}: possibly unused. Still using {}?", name, name),
            };
            notices.push(message);
        }
        notices
    }

    fn format_notices(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let notices: Vec<(bool, String)> = result
            .needing_attention()
            .flat_map(|record| {
                let is_error = record.has_error();
                self.notices(record)
                    .into_iter()
                    .map(move |line| (is_error, line))
            })
            .collect();
        if notices.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}:", "Notices".bold())?;
        } else {
            writeln!(writer, "Notices:")?;
        }
        for (is_error, line) in notices {
            match (self.color, is_error) {
                (true, true) => writeln!(writer, "  {} {}", "✗".red(), line)?,
                (true, false) => writeln!(writer, "  {} {}", "!".yellow(), line)?,
                (false, _) => writeln!(writer, "  - {}", line)?,
            }
        }
        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &AnalysisResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if result.is_clean() {
            if self.verbosity != Verbosity::Quiet {
                if self.color {
                    writeln!(writer, "{}", ALL_CLEAR_MESSAGE.green())?;
                } else {
                    writeln!(writer, "{}", ALL_CLEAR_MESSAGE)?;
                }
            }
            return Ok(());
        }

        let groups = group_records(&result.packages);
        let max_name_len = groups
            .iter()
            .flat_map(|g| g.records.iter())
            .map(|r| r.module_name.len())
            .max()
            .unwrap_or(0)
            .max(20);

        for group in &groups {
            if self.verbosity != Verbosity::Quiet {
                self.format_group_heading(group.kind, writer)?;
            }
            for record in &group.records {
                self.format_record_line(record, max_name_len, writer)?;
            }
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer)?;
            }
        }

        self.format_notices(result, writer)
    }

    fn format_errors(
        &self,
        errors: &[PackageIssue],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        for issue in errors {
            let label = format!("Error({}):", issue.package);
            if self.color {
                writeln!(writer, "{} {}", label.red().bold(), issue.message)?;
            } else {
                writeln!(writer, "{} {}", label, issue.message)?;
            }
        }
        if !errors.is_empty() {
            writeln!(writer)?;
        }
        Ok(())
    }

    fn format_outcome(
        &self,
        result: &AnalysisResult,
        outcome: &UpdateOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match outcome {
            UpdateOutcome::NoOp if self.verbosity == Verbosity::Quiet => {}
            UpdateOutcome::NoOp if group_records(&result.packages).is_empty() => {
                if self.color {
                    writeln!(writer, "{}", ALL_CLEAR_MESSAGE.green())?;
                } else {
                    writeln!(writer, "{}", ALL_CLEAR_MESSAGE)?;
                }
            }
            UpdateOutcome::NoOp => {
                writeln!(writer, "No packages selected for update.")?;
            }
            UpdateOutcome::Updated { specifiers } => {
                if self.color {
                    writeln!(writer, "{}", "Updated:".green().bold())?;
                } else {
                    writeln!(writer, "Updated:")?;
                }
                for specifier in specifiers {
                    writeln!(writer, "  {}", specifier)?;
                }
            }
        }
        Ok(())
    }
}
