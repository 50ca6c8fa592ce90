//! Logging initialization for the CLI.
//!
//! Diagnostics go to stderr so stdout stays clean for the report (and for
//! `--json`). `RUST_LOG` takes precedence over the verbosity flags.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level selected by the command-line flags
pub fn level_for(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Initialize the global tracing subscriber.
///
/// Calling it a second time is a no-op.
pub fn init(verbose: bool, debug: bool) {
    let level = level_for(verbose, debug);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,depaudit={}", level.as_str().to_lowercase())));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
