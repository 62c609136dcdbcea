//! CLI-specific error types
//!
//! Every CLI error is fatal: it is printed and the process exits non-zero.

use thiserror::Error;

use crate::config::ConfigError;
use crate::observability::TracingInitError;
use crate::rest_api::ApiError;
use crate::store::LoadError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load collection: {0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Query(#[from] ApiError),

    #[error(transparent)]
    Tracing(#[from] TracingInitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "SLIMEDEX_CLI_CONFIG_ERROR",
            CliError::Load(_) => "SLIMEDEX_CLI_LOAD_ERROR",
            CliError::Query(_) => "SLIMEDEX_CLI_QUERY_ERROR",
            CliError::Tracing(_) => "SLIMEDEX_CLI_TRACING_ERROR",
            CliError::Io(_) => "SLIMEDEX_CLI_IO_ERROR",
            CliError::Serialize(_) => "SLIMEDEX_CLI_IO_ERROR",
        }
    }
}
