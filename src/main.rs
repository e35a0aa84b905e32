//! Prep: render configuration templates from layered variables.
//!
//! This is the main entry point for the `prep` CLI. It parses arguments,
//! dispatches to rendering or pre-check, and handles errors with proper
//! exit codes.

mod cli;
mod commands;
pub mod error;
pub mod exit_codes;
pub mod fs;
mod logging;
pub mod precheck;
pub mod template;
pub mod vars;

use cli::Invocation;
use error::PrepError;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();

    match Invocation::from_env().and_then(commands::dispatch) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            report(&err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

/// Print a user-actionable error message.
fn report(err: &PrepError) {
    match err {
        // clap renders its own help, version and parse errors.
        PrepError::Cli(clap_err) => {
            let _ = clap_err.print();
        }
        _ if err.wants_usage() => {
            eprintln!("Error: {}", err);
            eprintln!("\n---\n");
            eprintln!("{}", cli::usage());
        }
        _ => eprintln!("Error: {}", err),
    }
}
