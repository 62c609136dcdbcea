//! # Query Translation
//!
//! Converts untyped HTTP query parameters into an immutable [`QuerySpec`]:
//! filter predicates, sort keys, projection and pagination.

pub mod builder;
pub mod errors;
pub mod fields;
pub mod operator;
pub mod params;
pub mod path;
pub mod spec;

pub use builder::QueryBuilder;
pub use errors::{QueryError, QueryResult};
pub use fields::{FieldDef, FieldMap, FieldType, QueryPolicy, UnknownFieldPolicy};
pub use operator::Operator;
pub use params::{RawParameters, RESERVED_KEYS};
pub use spec::{
    FilterSpec, FilterValue, PaginationResult, PaginationSpec, Predicate, ProjectionMode,
    ProjectionSpec, QuerySpec, SortDirection, SortKey, SortSpec,
};
