//! # ddtag
//!
//! Command-line entry point: parses arguments, sets up logging, and runs the
//! evaluation with its report on stdout.

mod args;

use anyhow::Result;
use args::Args;
use clap::Parser;
use ddtag::{config::EvaluateOptions, evaluate::evaluate};
use std::io;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Logs go to stderr so stdout carries only the report.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = EvaluateOptions::from(args);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    evaluate(&options, &mut out)?;

    Ok(())
}
