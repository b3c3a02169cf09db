//! Implementation of `gq parse`.

use std::process::ExitCode;

use gq_query::parse_with;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{JsonParseOutput, JsonQueryResult, print_json, report_error},
};

/// Parses each query and prints its tree, continuing past failures.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let results: Vec<_> = cmd
        .queries
        .iter()
        .map(|query| (query.as_str(), parse_with(query, ctx.options())))
        .collect();
    let failed = results.iter().any(|(_, result)| result.is_err());

    if cmd.json {
        let output = JsonParseOutput {
            queries: results
                .into_iter()
                .map(|(query, result)| JsonQueryResult::new(query, result))
                .collect(),
        };
        let code = print_json(&output);
        if !failed {
            return code;
        }
    } else {
        let multiple = results.len() > 1;
        for (i, (query, result)) in results.iter().enumerate() {
            if multiple {
                if i > 0 {
                    println!();
                }
                println!("# {query}");
            }
            match result {
                Ok(tree) => print!("{tree}"),
                Err(e) => report_error(query, e),
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
