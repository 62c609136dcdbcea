//! # Query Specification
//!
//! Immutable description of one list request: filter, sort, projection and
//! optional pagination.

use serde::Serialize;
use serde_json::{Map, Value};

use super::operator::Operator;
use super::path;

// ==================
// Filter
// ==================

/// Raw predicate value, coerced later by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Every raw item, one for scalars
    pub fn items(&self) -> &[String] {
        match self {
            FilterValue::Single(value) => std::slice::from_ref(value),
            FilterValue::List(values) => values,
        }
    }
}

/// One `(field, operator, value)` condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl Predicate {
    pub fn new(field: impl Into<String>, operator: Operator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, Operator::Equal, FilterValue::Single(value.into()))
    }
}

/// Predicates combined with AND logic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

impl FilterSpec {
    /// A filter that matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

// ==================
// Sort
// ==================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Ordered sort keys; earlier keys take priority. Empty keeps store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Keep the store's natural order
    pub fn natural() -> Self {
        Self::default()
    }

    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Single ascending key on the identity field
    pub fn by_identity(identity_field: &str) -> Self {
        Self::new(vec![SortKey::asc(identity_field)])
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_natural(&self) -> bool {
        self.keys.is_empty()
    }
}

// ==================
// Projection
// ==================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Include,
    Exclude,
}

/// Fields returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionSpec {
    mode: ProjectionMode,
    fields: Vec<String>,
}

impl Default for ProjectionSpec {
    fn default() -> Self {
        Self::exclude(Vec::new())
    }
}

impl ProjectionSpec {
    /// Only these fields survive
    pub fn include(fields: Vec<String>) -> Self {
        Self {
            mode: ProjectionMode::Include,
            fields: dedup(fields),
        }
    }

    /// These fields are removed
    pub fn exclude(fields: Vec<String>) -> Self {
        Self {
            mode: ProjectionMode::Exclude,
            fields: dedup(fields),
        }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Apply the projection to one record
    pub fn apply(&self, record: &Value) -> Value {
        match self.mode {
            ProjectionMode::Include => {
                let mut projected = Map::new();
                for field in &self.fields {
                    path::copy_path(record, &mut projected, field);
                }
                Value::Object(projected)
            }
            ProjectionMode::Exclude => {
                let mut projected = record.clone();
                for field in &self.fields {
                    path::remove_path(&mut projected, field);
                }
                projected
            }
        }
    }
}

fn dedup(fields: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        if !unique.contains(&field) {
            unique.push(field);
        }
    }
    unique
}

// ==================
// Pagination
// ==================

/// Page window; `page` and `limit` are always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationSpec {
    page: u64,
    limit: u64,
    skip: u64,
}

impl PaginationSpec {
    /// Returns `None` when either value is zero or the skip overflows
    pub fn new(page: u64, limit: u64) -> Option<Self> {
        if page == 0 || limit == 0 {
            return None;
        }
        let skip = (page - 1).checked_mul(limit)?;
        Some(Self { page, limit, skip })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Records to skip: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        self.skip
    }
}

/// Pagination metadata returned with a page of records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PaginationResult {
    /// Derive page count; `None` when nothing matched
    pub fn new(pagination: &PaginationSpec, total_count: u64) -> Option<Self> {
        if total_count == 0 {
            return None;
        }
        Some(Self {
            page: pagination.page(),
            limit: pagination.limit(),
            total_count,
            total_pages: total_count.div_ceil(pagination.limit()),
        })
    }
}

// ==================
// Aggregate
// ==================

/// Complete, immutable query for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    filter: FilterSpec,
    sort: SortSpec,
    projection: ProjectionSpec,
    pagination: Option<PaginationSpec>,
}

impl QuerySpec {
    pub fn new(
        filter: FilterSpec,
        sort: SortSpec,
        projection: ProjectionSpec,
        pagination: Option<PaginationSpec>,
    ) -> Self {
        Self {
            filter,
            sort,
            projection,
            pagination,
        }
    }

    /// Filter only, in store order, every field, no page window
    pub fn unbounded(filter: FilterSpec) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn projection(&self) -> &ProjectionSpec {
        &self.projection
    }

    pub fn pagination(&self) -> Option<&PaginationSpec> {
        self.pagination.as_ref()
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_skip() {
        let pagination = PaginationSpec::new(2, 6).unwrap();
        assert_eq!(pagination.skip(), 6);
        assert_eq!(pagination.limit(), 6);
        assert_eq!(PaginationSpec::new(1, 6).unwrap().skip(), 0);
    }

    #[test]
    fn test_pagination_rejects_zero_and_overflow() {
        assert!(PaginationSpec::new(0, 6).is_none());
        assert!(PaginationSpec::new(1, 0).is_none());
        assert!(PaginationSpec::new(u64::MAX, u64::MAX).is_none());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pagination = PaginationSpec::new(1, 6).unwrap();
        let result = PaginationResult::new(&pagination, 13).unwrap();
        assert_eq!(result.total_pages, 3);
        assert_eq!(PaginationResult::new(&pagination, 12).unwrap().total_pages, 2);
        assert_eq!(PaginationResult::new(&pagination, 1).unwrap().total_pages, 1);
    }

    #[test]
    fn test_zero_count_has_no_metadata() {
        let pagination = PaginationSpec::new(1, 6).unwrap();
        assert!(PaginationResult::new(&pagination, 0).is_none());
    }

    #[test]
    fn test_pagination_result_serialization() {
        let pagination = PaginationSpec::new(2, 5).unwrap();
        let json = serde_json::to_value(PaginationResult::new(&pagination, 11).unwrap()).unwrap();
        assert_eq!(
            json,
            json!({"page": 2, "limit": 5, "totalCount": 11, "totalPages": 3})
        );
    }

    #[test]
    fn test_include_projection() {
        let projection = ProjectionSpec::include(vec!["name".to_string(), "diet".to_string()]);
        let record = json!({"id": "pink", "name": "Pink Slime", "diet": "all", "__v": 0});
        assert_eq!(projection.apply(&record), json!({"name": "Pink Slime", "diet": "all"}));
    }

    #[test]
    fn test_exclude_projection() {
        let projection = ProjectionSpec::exclude(vec!["__v".to_string()]);
        let record = json!({"id": "pink", "__v": 0});
        assert_eq!(projection.apply(&record), json!({"id": "pink"}));
    }

    #[test]
    fn test_projection_dedups_fields() {
        let projection =
            ProjectionSpec::include(vec!["name".to_string(), "name".to_string()]);
        assert_eq!(projection.fields(), ["name".to_string()]);
    }
}
