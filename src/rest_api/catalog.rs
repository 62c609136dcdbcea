//! # Collection Catalog
//!
//! Name-to-collection registry shared by every request.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::config::CatalogConfig;
use crate::store::{Collection, InMemoryCollection, LoadError};

use super::errors::{ApiError, ApiResult};

/// Registered collections by name
#[derive(Default, Clone)]
pub struct Catalog {
    collections: BTreeMap<String, Arc<dyn Collection>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every configured collection from its data file
    pub fn from_config(config: &CatalogConfig) -> Result<Self, LoadError> {
        let mut catalog = Self::new();
        for (name, collection) in &config.collections {
            let loaded =
                InMemoryCollection::load(name.as_str(), collection.policy(), &collection.data_path)?;
            info!(
                collection = %name,
                path = %collection.data_path.display(),
                "collection loaded"
            );
            catalog.insert(Arc::new(loaded));
        }
        Ok(catalog)
    }

    /// Register a collection under its own name, replacing any previous one
    pub fn insert(&mut self, collection: Arc<dyn Collection>) {
        self.collections
            .insert(collection.name().to_string(), collection);
    }

    pub fn get(&self, name: &str) -> ApiResult<Arc<dyn Collection>> {
        self.collections
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::CollectionNotFound(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
