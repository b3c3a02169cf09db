//! Implementation of `gq config`.

use std::process::ExitCode;

use crate::cli::{context::CommandContext, error::CliError};

/// Prints the configuration sources and the effective settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    if ctx.config.sources.is_empty() {
        println!("# no config files found, using defaults");
    } else {
        println!("# config files (highest precedence first):");
        for path in &ctx.config.sources {
            println!("#   {}", path.display());
        }
    }
    println!();

    match ctx.config.settings_to_toml() {
        Ok(toml) => {
            print!("{toml}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", CliError::from(e));
            ExitCode::FAILURE
        }
    }
}
