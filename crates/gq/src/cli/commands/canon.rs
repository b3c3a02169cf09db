//! Implementation of `gq canon`.

use std::process::ExitCode;

use gq_query::parse_with;

use crate::cli::{
    args::CanonCommand, context::CommandContext, error::CliError, output::report_error,
};

/// Parses a query and prints its canonical text.
pub fn run(ctx: &CommandContext, cmd: &CanonCommand) -> ExitCode {
    let tree = match parse_with(&cmd.query, ctx.options()) {
        Ok(tree) => tree,
        Err(e) => {
            report_error(&cmd.query, &e);
            return ExitCode::FAILURE;
        }
    };

    match tree.to_query_string() {
        Some(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("error: {}", CliError::NoCanonicalForm);
            ExitCode::FAILURE
        }
    }
}
