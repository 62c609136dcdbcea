//! CLI argument definitions using clap
//!
//! Commands:
//! - slimedex serve --config <path> [--port <n>]
//! - slimedex query --config <path> --collection <name> [<query-string>]
//! - slimedex check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::observability::LogFormat;

/// slimedex - a queryable catalog of tagged records served over HTTP
#[derive(Parser, Debug)]
#[command(name = "slimedex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the catalog and serve it over HTTP
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Port override
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },

    /// Run one list query and print the response envelope
    Query {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Collection to query
        #[arg(long)]
        collection: String,

        /// Query string, e.g. "diet=meat&sort=-name&page=2"
        #[arg(default_value = "")]
        query: String,
    },

    /// Validate configuration and data files
    Check {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
