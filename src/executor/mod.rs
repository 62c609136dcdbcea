//! Query executor
//!
//! Resolves a [`QuerySpec`](crate::query::QuerySpec) against a collection,
//! counts the filter's total for pagination, and groups records by field.

#[allow(clippy::module_inception)]
mod executor;
mod grouping;
mod pagination;

pub use executor::{execute, run, QueryOutput};
pub use grouping::{group_by, Group};
pub use pagination::{count, pagination_info};
