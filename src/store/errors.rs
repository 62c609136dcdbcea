//! Errors raised while loading collection data files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of records")]
    NotAnArray,

    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index} has no usable '{field}' identity")]
    MissingIdentity { index: usize, field: String },

    #[error("Duplicate identity '{0}'")]
    DuplicateIdentity(String),
}
