//! Query execution against a [`Collection`].

use tracing::debug;

use crate::query::{PaginationResult, QueryResult, QuerySpec};
use crate::store::{Collection, Record};

use super::pagination::pagination_info;

/// A page of records plus the metadata describing it
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub data: Vec<Record>,
    pub pagination: Option<PaginationResult>,
}

/// Resolve a spec to its ordered, projected, windowed records.
///
/// An empty result is not an error.
pub async fn execute<C>(collection: &C, spec: &QuerySpec) -> QueryResult<Vec<Record>>
where
    C: Collection + ?Sized,
{
    debug!(
        collection = collection.name(),
        predicates = spec.filter().len(),
        sort_keys = spec.sort().keys().len(),
        paginated = spec.is_paginated(),
        "executing query"
    );
    collection.find(spec).await
}

/// Fetch the page and count the filter's total concurrently.
///
/// Either failure fails the whole request; no partial output is returned.
pub async fn run<C>(collection: &C, spec: &QuerySpec) -> QueryResult<QueryOutput>
where
    C: Collection + ?Sized,
{
    let (data, pagination) =
        tokio::try_join!(execute(collection, spec), pagination_info(collection, spec))?;

    Ok(QueryOutput { data, pagination })
}
