//! Error type for CLI commands.

use std::io;

use gq_config::ConfigError;
use gq_query::QueryError;
use thiserror::Error;

/// Errors surfaced by `gq` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The query could not be tokenized or parsed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// The working directory is unavailable.
    #[error("could not determine current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// `--max-depth` is outside the supported range.
    #[error("--max-depth must be between {minimum} and {maximum}, got {value}")]
    MaxDepth {
        /// Value given on the command line.
        value: usize,
        /// Smallest accepted value.
        minimum: usize,
        /// Largest accepted value.
        maximum: usize,
    },

    /// The tree has no canonical text form.
    #[error("query has no canonical text form")]
    NoCanonicalForm,

    /// JSON output could not be produced.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}
