//! CLI support for the `gq` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod error;
pub mod output;
pub mod status;
