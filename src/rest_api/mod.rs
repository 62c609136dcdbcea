//! # REST API
//!
//! Read-only HTTP surface over the collection catalog.
//!
//! ## Endpoints
//!
//! - `GET /health`
//! - `GET {prefix}/:collection`: list with query translation
//! - `GET {prefix}/:collection/:id`: single record by identity
//! - `GET {prefix}/:collection/by/:field/:value`: list with an injected predicate
//! - `GET {prefix}/:collection/group/:field`: records grouped by a field
//!
//! ## Query Syntax
//!
//! - `field=value`, `field[op]=value` with `op` in eq, ne, gt, gte, lt, lte, in, nin
//! - `sort=-name,type`
//! - `fields=name,diet` or `fields=-__v`
//! - `page=2&limit=6`

pub mod catalog;
pub mod context;
pub mod errors;
pub mod response;
pub mod server;

pub use catalog::Catalog;
pub use context::{RequestContext, REQUEST_ID_HEADER};
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use response::{GroupEnvelope, ListEnvelope, SingleEnvelope};
pub use server::{build_router, list_records, ApiServer, HealthResponse};
