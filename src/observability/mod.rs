//! Observability for slimedex
//!
//! Structured logging through `tracing`. The subscriber is installed once by
//! the binary; library code only emits events.

mod logging;

pub use logging::{init_tracing, LogFormat, TracingInitError, DEFAULT_FILTER};
