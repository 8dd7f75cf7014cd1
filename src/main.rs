//! Application entry point.
//!
//! Parses command-line arguments, delegates to [`runner::run`] and prints the
//! generated project path.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use manifest_editor::{cli::Cli, runner};
use tracing::Level;
use tracing_subscriber::fmt;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let max_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::ERROR
    };
    fmt().with_writer(io::stderr).with_max_level(max_level).init();
    match runner::run(&cli) {
        Ok(project_path) => {
            if let Err(err) = writeln!(io::stdout(), "{project_path}") {
                tracing::error!(error = %err, "failed to print the project path");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) if runner::is_internal_failure(&err) => {
            tracing::error!(
                error = %format!("{err:#}"),
                "internal editor defect; please report it with the command that triggered it"
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "edit failed");
            ExitCode::FAILURE
        }
    }
}
