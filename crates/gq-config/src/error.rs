//! Error types for gq configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A depth limit outside the range the parser supports.
    #[error("invalid parser.max_depth {value} in {path}: must be between {minimum} and {maximum}")]
    MaxDepthOutOfRange {
        /// File that set the value.
        path: PathBuf,
        /// The configured value.
        value: usize,
        /// Smallest accepted value.
        minimum: usize,
        /// Largest accepted value.
        maximum: usize,
    },

    /// Failed to serialize the effective settings.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ser::Error),
}
