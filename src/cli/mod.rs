//! CLI module for slimedex
//!
//! Provides command-line interface for:
//! - serve: Load the catalog and serve it over HTTP
//! - query: One-shot list query
//! - check: Validate configuration and data files

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, query, run, run_command, serve};
pub use errors::{CliError, CliResult};
