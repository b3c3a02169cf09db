//! Shared state for CLI command execution.

use std::env;

use gq_config::{Config, MAX_MAX_DEPTH, MIN_MAX_DEPTH};
use gq_query::ParseOptions;
use tracing::debug;

use super::{args::GlobalArgs, error::CliError};

/// Resolved configuration for a single `gq` invocation.
pub struct CommandContext {
    /// Effective configuration, including command-line overrides.
    pub config: Config,
}

impl CommandContext {
    /// Loads configuration from `--config` or by discovery, then applies `--max-depth`.
    pub fn load(global: &GlobalArgs) -> Result<Self, CliError> {
        let mut config = match &global.config {
            Some(path) => Config::load_from_files(&[path.clone()])?,
            None => {
                let cwd = env::current_dir().map_err(CliError::CurrentDir)?;
                Config::load(&cwd)?
            }
        };

        if let Some(max_depth) = global.max_depth {
            if !(MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&max_depth) {
                return Err(CliError::MaxDepth {
                    value: max_depth,
                    minimum: MIN_MAX_DEPTH,
                    maximum: MAX_MAX_DEPTH,
                });
            }
            config.parser.max_depth = max_depth;
        }

        debug!(
            max_depth = config.parser.max_depth,
            sources = config.sources.len(),
            "configuration loaded"
        );
        Ok(Self { config })
    }

    /// Parser options for this invocation.
    pub fn options(&self) -> &ParseOptions {
        &self.config.parser
    }
}
