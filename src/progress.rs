//! Terminal feedback while packages are read and looked up
//!
//! Drawn on stderr with indicatif. Quiet and JSON runs get a no-op reporter.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Progress for one analysis: an indeterminate loading phase, then one tick
/// per registry lookup
pub struct Progress {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Spinner shown while manifests and installed modules are read
    pub fn loading(&mut self, what: &str) {
        if !self.enabled {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars(TICKS)
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(what.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.replace(spinner);
    }

    /// Bar counting finished registry lookups
    pub fn lookups(&mut self, total: usize) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .tick_chars(TICKS)
            .template("{spinner:.cyan} Checking {pos}/{len} [{bar:30.cyan/blue}] {msg}")
        {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        self.replace(bar);
    }

    /// Record one finished lookup; the bar shows the last package checked
    pub fn checked(&self, package: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(package.to_string());
            bar.inc(1);
        }
    }

    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn replace(&mut self, next: ProgressBar) {
        self.clear();
        self.bar = Some(next);
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.clear();
    }
}
