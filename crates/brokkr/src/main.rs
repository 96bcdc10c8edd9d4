//! Brokkr CLI - extensible workspace tooling
//!
//! This is the main entry point for the brokkr command-line interface.

mod cli;
mod commands;
mod gradle;
mod normalize;
mod output;
mod parse;
mod version;

use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    init_tracing(
        args.iter().any(|a| a == "--trace"),
        args.iter().any(|a| a == "-q" || a == "--quiet"),
    );

    match cli::BrokkrCli::new().run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(err.exit_code()),
    }
}

/// Initialize tracing with appropriate verbosity
///
/// Diagnostics go to stderr so command output on stdout stays clean.
fn init_tracing(trace: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if trace {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
