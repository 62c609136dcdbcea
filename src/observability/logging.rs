//! Subscriber setup.

use clap::ValueEnum;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Directives used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "slimedex=info,tower_http=info";

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Debug, Error)]
#[error("Tracing initialization failed: {0}")]
pub struct TracingInitError(String);

/// Install the global subscriber, writing to stderr.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), TracingInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = Registry::default().with(filter);
    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| TracingInitError(e.to_string()))
}
