//! Configuration system for gq.
//!
//! gq uses TOML configuration files named `.gq.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.gq.toml` files found,
//! then loading `~/.gq.toml` as the global config with lowest precedence.
//!
//! ```toml
//! [parser]
//! max_depth = 32
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod parse;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path};
pub use error::ConfigError;
pub use gq_query::MAX_MAX_DEPTH;
use gq_query::ParseOptions;
pub use parse::{RawConfig, RawParserSettings, parse_config_file, parse_config_str};
use serde::Serialize;

/// Smallest usable `parser.max_depth`: the query, or and and frames of a plain query.
pub const MIN_MAX_DEPTH: usize = 3;

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parser options.
    pub parser: ParseOptions,
    /// Files the configuration was merged from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.gq.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parser: self.parser,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// TOML view of the effective settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Parser settings.
    parser: ParseOptions,
}

/// Merges configuration files into a single `Config`.
///
/// Configs are given highest precedence first; for each setting the first file that defines
/// it wins. A `max_depth` outside `MIN_MAX_DEPTH..=MAX_MAX_DEPTH` is rejected.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut parser = ParseOptions::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        let Some(max_depth) = parsed.config.parser.as_ref().and_then(|p| p.max_depth) else {
            continue;
        };
        if !(MIN_MAX_DEPTH..=MAX_MAX_DEPTH).contains(&max_depth) {
            return Err(ConfigError::MaxDepthOutOfRange {
                path: parsed.path.clone(),
                value: max_depth,
                minimum: MIN_MAX_DEPTH,
                maximum: MAX_MAX_DEPTH,
            });
        }
        parser.max_depth = max_depth;
    }

    Ok(Config {
        parser,
        sources: configs.iter().map(|c| c.path.clone()).collect(),
    })
}
