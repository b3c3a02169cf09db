//! Clap argument definitions for the `gq` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "gq")]
#[command(about = "Inspect how boolean search queries tokenize and parse")]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file to use instead of discovered .gq.toml files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum parser nesting depth (overrides configuration)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Verbosity level (-v for debug logging, -vv for trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Arguments for `gq parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Queries to parse
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Output the tree in JSON interchange form
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `gq tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    /// Query to tokenize
    pub query: String,

    /// Output tokens as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `gq canon`.
#[derive(Args, Debug, Clone)]
pub struct CanonCommand {
    /// Query to normalize
    pub query: String,
}

/// Supported `gq` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their syntax trees
    #[command(after_help = "\
QUERY SYNTAX:
  term               Term must appear
  term1 term2        Both terms (implicit AND)
  term1 AND term2    Both terms
  term1 OR term2     Either term
  NOT term           Term must NOT appear
  \"quoted text\"      Literal text, keywords disabled
  'quoted text'      Literal text, keywords disabled

Keywords are case-insensitive. NOT binds tighter than AND, AND tighter than OR.")]
    Parse(ParseCommand),

    /// Print the token stream of a query
    Tokens(TokensCommand),

    /// Print a query in canonical form
    Canon(CanonCommand),

    /// Show effective configuration
    Config,
}
