//! Implementation of `gq tokens`.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use gq_query::tokenize;

use crate::cli::{
    args::TokensCommand,
    error::CliError,
    output::{JsonToken, JsonTokensOutput, print_json, print_json_error, report_error},
};

/// Prints the token stream of a query.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    let tokens = match tokenize(&cmd.query) {
        Ok(tokens) => tokens,
        Err(e) => {
            if cmd.json {
                return print_json_error(&cmd.query, &CliError::from(e));
            }
            report_error(&cmd.query, &e);
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&JsonTokensOutput {
            query: &cmd.query,
            tokens: tokens.iter().map(JsonToken::from).collect(),
        });
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Kind", "Raw", "Position"]);
    for token in &tokens {
        table.add_row(vec![
            Cell::new(token.kind),
            Cell::new(&token.raw),
            Cell::new(token.position),
        ]);
    }
    println!("{table}");

    ExitCode::SUCCESS
}
