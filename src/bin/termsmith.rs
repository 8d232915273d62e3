//! Termsmith CLI binary.

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use termsmith::cli::args::TermsmithArgs;
use termsmith::cli::commands::execute_command;

/// Log level for a verbosity count; `RUST_LOG` may still override it.
fn level_for(verbosity: u8) -> LevelFilter {
    [
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
    ]
    .get(usize::from(verbosity))
    .copied()
    .unwrap_or(LevelFilter::Trace)
}

fn main() -> ExitCode {
    let args = TermsmithArgs::parse();

    env_logger::Builder::new()
        .filter_level(level_for(args.verbosity()))
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    match execute_command(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("termsmith: {e}");
            ExitCode::FAILURE
        }
    }
}
