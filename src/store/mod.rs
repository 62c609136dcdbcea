//! # Document Store
//!
//! The collection capability the query layer runs against, and an in-memory
//! implementation loaded from JSON files.

pub mod errors;
pub mod matcher;
pub mod memory;
pub mod sorter;

use async_trait::async_trait;
use serde_json::Value;

use crate::query::{FilterSpec, QueryPolicy, QueryResult, QuerySpec};

pub use errors::LoadError;
pub use matcher::CompiledFilter;
pub use memory::InMemoryCollection;
pub use sorter::RecordSorter;

/// One catalog entry; its shape belongs to the caller
pub type Record = Value;

/// A queryable collection of records of one kind.
///
/// `find` applies filter, sort, skip/limit and projection; `count_documents`
/// applies the filter alone, so for any filter `F` the count equals the
/// length of `find` with `F` and no page window.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Collection name as exposed over HTTP
    fn name(&self) -> &str;

    /// Field rules used to build and coerce queries
    fn policy(&self) -> &QueryPolicy;

    /// Records matching the spec, in order, projected and windowed
    async fn find(&self, spec: &QuerySpec) -> QueryResult<Vec<Record>>;

    /// Number of records matching the filter
    async fn count_documents(&self, filter: &FilterSpec) -> QueryResult<u64>;

    /// Record whose identity field equals `id`
    async fn find_by_id(&self, id: &str) -> QueryResult<Option<Record>>;
}

/// Render an identity value as the string used in URLs
pub fn identity_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
