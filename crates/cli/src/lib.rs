//! Command-line shell around `apigen-core`: reads an API document, resolves
//! the target profile and output directory, and writes the generated modules.

mod cli;
mod config;
pub mod logging;
mod sink;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands};

/// Parse `args` (including the program name) and run the selected command.
/// Returns the process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => cli::run_generate(&args),
            Some(Commands::Profiles(args)) => cli::run_profiles(&args),
            None => {
                let mut cmd = Cli::command();
                if let Err(err) = cmd.print_help() {
                    tracing::warn!(error = %err, "failed to print help");
                }
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            if let Err(err) = e.print() {
                tracing::warn!(error = %err, "failed to print usage error");
            }
            code
        }
    }
}
