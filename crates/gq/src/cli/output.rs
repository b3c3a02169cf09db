//! Output helpers for CLI commands.

use std::process::ExitCode;

use gq_query::{AstNode, QueryError, Token};
use serde::Serialize;

use super::{
    error::CliError,
    status::{message_or, status_code},
};

/// Fallback message for errors that render as empty text.
const DEFAULT_ERROR_MESSAGE: &str = "query could not be processed";

/// JSON output for `gq parse --json`.
#[derive(Serialize)]
pub struct JsonParseOutput<'a> {
    /// One entry per query, in argument order.
    pub queries: Vec<JsonQueryResult<'a>>,
}

/// Outcome for a single query.
#[derive(Serialize)]
pub struct JsonQueryResult<'a> {
    /// Query text as given.
    pub query: &'a str,
    /// Parsed tree in interchange form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<AstNode>,
    /// Failure details.
    #[serde(flatten)]
    pub error: Option<JsonError>,
}

impl<'a> JsonQueryResult<'a> {
    /// Builds a result entry from a parse outcome.
    pub fn new(query: &'a str, result: Result<AstNode, QueryError>) -> Self {
        match result {
            Ok(tree) => Self {
                query,
                tree: Some(tree),
                error: None,
            },
            Err(e) => Self {
                query,
                tree: None,
                error: Some(JsonError::from(&CliError::from(e))),
            },
        }
    }
}

/// Error details in JSON output.
#[derive(Serialize)]
pub struct JsonError {
    /// Human-readable message.
    pub error: String,
    /// Byte offset the error points at, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Transport status code for the failure.
    pub status: u16,
}

impl From<&CliError> for JsonError {
    fn from(err: &CliError) -> Self {
        let position = match err {
            CliError::Query(e) => e.position(),
            _ => None,
        };
        Self {
            error: message_or(err, DEFAULT_ERROR_MESSAGE),
            position,
            status: status_code(err),
        }
    }
}

/// JSON output for `gq tokens --json`.
#[derive(Serialize)]
pub struct JsonTokensOutput<'a> {
    /// Query text as given.
    pub query: &'a str,
    /// Tokens in input order, ending with EOF.
    pub tokens: Vec<JsonToken>,
}

/// A single token in JSON output.
#[derive(Serialize)]
pub struct JsonToken {
    /// Token kind name.
    pub kind: String,
    /// Exact source text, including quotes.
    pub raw: String,
    /// Byte offset of the token start.
    pub position: usize,
    /// Literal text for WORD and quoted tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl From<&Token> for JsonToken {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind.to_string(),
            raw: token.raw.clone(),
            position: token.position,
            literal: token.literal().map(str::to_string),
        }
    }
}

/// Prints a value as pretty JSON, reporting serialization failures on stderr.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", CliError::from(e));
            ExitCode::FAILURE
        }
    }
}

/// Prints an error for `query` on stderr, with a caret under the failing position.
pub fn report_error(query: &str, err: &QueryError) {
    eprintln!("{}", err.render(query));
}

/// Prints a failure as a JSON document on stdout.
pub fn print_json_error(query: &str, err: &CliError) -> ExitCode {
    /// Envelope for a single failed query.
    #[derive(Serialize)]
    struct Envelope<'a> {
        /// Query text as given.
        query: &'a str,
        /// Failure details.
        #[serde(flatten)]
        error: JsonError,
    }

    print_json(&Envelope {
        query,
        error: JsonError::from(err),
    });
    ExitCode::FAILURE
}
