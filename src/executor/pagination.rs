//! Pagination counter.
//!
//! Counts with the spec's filter alone, never its sort, projection or window.

use crate::query::{FilterSpec, PaginationResult, QueryResult, QuerySpec};
use crate::store::Collection;

/// Number of records matching `filter`
pub async fn count<C>(collection: &C, filter: &FilterSpec) -> QueryResult<u64>
where
    C: Collection + ?Sized,
{
    collection.count_documents(filter).await
}

/// Pagination metadata for a spec.
///
/// `None` when the spec was never paginated (no count is issued) and when
/// nothing matches the filter.
pub async fn pagination_info<C>(
    collection: &C,
    spec: &QuerySpec,
) -> QueryResult<Option<PaginationResult>>
where
    C: Collection + ?Sized,
{
    let Some(pagination) = spec.pagination() else {
        return Ok(None);
    };

    let total_count = count(collection, spec.filter()).await?;
    Ok(PaginationResult::new(pagination, total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryBuilder, QueryPolicy, RawParameters};
    use crate::store::InMemoryCollection;
    use serde_json::json;

    fn collection() -> InMemoryCollection {
        InMemoryCollection::new(
            "slimes",
            QueryPolicy::default(),
            vec![
                json!({"id": "a", "type": "docile"}),
                json!({"id": "b", "type": "docile"}),
                json!({"id": "c", "type": "hostile"}),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unpaginated_has_no_metadata() {
        let collection = collection();
        let params = RawParameters::parse("type=docile");
        let policy = collection.policy().clone();
        let spec = QueryBuilder::new(&params, &policy).filter().unwrap().sort().build();

        assert!(pagination_info(&collection, &spec).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_uses_filter_only() {
        let collection = collection();
        let params = RawParameters::parse("type=docile&limit=1&page=2&fields=id&sort=-id");
        let spec = QuerySpec::from_params(&params, collection.policy()).unwrap();

        let info = pagination_info(&collection, &spec).await.unwrap().unwrap();
        assert_eq!(info.total_count, 2);
        assert_eq!(info.total_pages, 2);
        assert_eq!(info.limit, 1);
    }
}
