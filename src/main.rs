//! dirtree - Print a directory subtree as a tree diagram
//!
//! dirtree provides:
//! - Depth-first rendering with directories listed before files
//! - Case-insensitive, stable name ordering
//! - Per-directory error lines instead of aborting on unreadable nodes
//! - Styled text, JSON and JSON Lines output

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;

use crate::core::style::Styler;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    // Help, missing and extra arguments all end with usage and exit code 1
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    init_logging(cli.verbose);
    let styler = Styler::detect(cli.no_color);

    match cli::run(cli, styler) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", styler.error(&format!("Error: {:#}", err)));
            ExitCode::from(1)
        }
    }
}
