//! Catalog Configuration
//!
//! Server settings and one entry per collection, read from a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::fields::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::query::{FieldMap, QueryPolicy, UnknownFieldPolicy};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "./slimedex.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix for collection routes (default: "/api")
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// One collection: where its records live and how they may be queried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// JSON array file holding the records
    pub data_path: PathBuf,

    #[serde(default = "default_identity_field")]
    pub identity_field: String,

    /// Fields stripped from every response
    #[serde(default = "default_hidden_fields")]
    pub hidden_fields: Vec<String>,

    #[serde(default = "default_limit")]
    pub default_limit: u64,

    #[serde(default = "default_max_limit")]
    pub max_limit: u64,

    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    /// Filterable fields with their types and allowed operators
    #[serde(default)]
    pub fields: FieldMap,
}

fn default_identity_field() -> String {
    "id".to_string()
}

fn default_hidden_fields() -> Vec<String> {
    vec!["__v".to_string()]
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn default_max_limit() -> u64 {
    MAX_LIMIT
}

impl CollectionConfig {
    /// Query rules derived from this entry
    pub fn policy(&self) -> QueryPolicy {
        QueryPolicy {
            identity_field: self.identity_field.clone(),
            hidden_fields: self.hidden_fields.clone(),
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            fields: self.fields.clone(),
            unknown_fields: self.unknown_fields,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub collections: BTreeMap<String, CollectionConfig>,
}

impl CatalogConfig {
    /// Load and validate a configuration file.
    ///
    /// Relative data paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: CatalogConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for collection in config.collections.values_mut() {
            if collection.data_path.is_relative() {
                collection.data_path = base.join(&collection.data_path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one collection must be configured".to_string(),
            ));
        }

        if !self.server.api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api_prefix must start with '/': {}",
                self.server.api_prefix
            )));
        }

        for (name, collection) in &self.collections {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "invalid collection name '{}'",
                    name
                )));
            }
            if collection.identity_field.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "collection '{}': identity_field must not be empty",
                    name
                )));
            }
            if collection.default_limit == 0 {
                return Err(ConfigError::Invalid(format!(
                    "collection '{}': default_limit must be at least 1",
                    name
                )));
            }
            if collection.max_limit < collection.default_limit {
                return Err(ConfigError::Invalid(format!(
                    "collection '{}': max_limit {} is below default_limit {}",
                    name, collection.max_limit, collection.default_limit
                )));
            }
        }

        Ok(())
    }
}
