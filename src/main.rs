//! depaudit - npm dependency auditor CLI tool
//!
//! Reports outdated, incorrect, missing and unused dependencies of a Node.js
//! project (or of the globally installed packages) and optionally updates
//! them through npm, yarn or pnpm.

use clap::Parser;
use depaudit::cli::CliArgs;
use depaudit::logging;
use depaudit::orchestrator::Orchestrator;
use depaudit::output::{create_formatter, OutputConfig};
use depaudit::package_manager::SystemInstaller;
use depaudit::update::{AutoSelect, InteractiveSelect};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.debug);

    if args.no_color {
        colored::control::set_override(false);
    }

    match run(args.clone()).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if !args.debug {
                eprintln!("For more detail, add `--debug` to the command");
            }
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("depaudit v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    let orchestrator = Orchestrator::new(&args)?;
    tracing::debug!(context = ?orchestrator.context(), "resolved configuration");

    let registry = orchestrator.default_registry()?;
    let result = orchestrator.analyze(&registry).await?;

    let formatter = create_formatter(OutputConfig::from(&args));

    if !args.wants_update() {
        let mut stdout = io::stdout().lock();
        formatter.format(&result, &mut stdout)?;
        stdout.flush()?;

        // A report-only run exits 1 when anything needs attention
        return Ok(if result.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    {
        let mut stdout = io::stdout().lock();
        formatter.format_errors(&result.errors, &mut stdout)?;
        stdout.flush()?;
    }

    let runner = SystemInstaller::new();
    let outcome = if args.update_all {
        orchestrator.update(&result, &mut AutoSelect, &runner).await?
    } else {
        let stdin = io::stdin();
        let mut strategy = InteractiveSelect::new(stdin.lock(), io::stdout());
        orchestrator.update(&result, &mut strategy, &runner).await?
    };

    let mut stdout = io::stdout().lock();
    formatter.format_outcome(&result, &outcome, &mut stdout)?;
    stdout.flush()?;
    Ok(ExitCode::SUCCESS)
}
