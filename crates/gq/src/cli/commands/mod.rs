//! Command implementations for the `gq` CLI.

mod canon;
mod config;
mod parse;
mod tokens;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Runs the selected subcommand.
pub fn run(command: &Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, cmd),
        Commands::Tokens(cmd) => tokens::run(cmd),
        Commands::Canon(cmd) => canon::run(ctx, cmd),
        Commands::Config => config::run(ctx),
    }
}
