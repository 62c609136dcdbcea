//! slimedex - a queryable catalog of tagged records served over HTTP
//!
//! HTTP query strings are translated into an immutable [`query::QuerySpec`]
//! (filter, sort, projection, pagination), executed against a
//! [`store::Collection`], and wrapped in JSON envelopes by [`rest_api`].

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod query;
pub mod rest_api;
pub mod store;
