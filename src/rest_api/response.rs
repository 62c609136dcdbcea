//! # Response Formatting
//!
//! Envelopes wrapping every successful response.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::executor::{Group, QueryOutput};
use crate::query::PaginationResult;
use crate::store::Record;

use super::context::RequestContext;

const SUCCESS: &str = "success";

/// List response with pagination
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnvelope {
    pub status: &'static str,
    pub requested_at: DateTime<Utc>,
    /// Records on this page
    pub results: usize,
    /// `null` when unpaginated or nothing matched
    pub pagination: Option<PaginationResult>,
    pub data: Vec<Record>,
}

impl ListEnvelope {
    pub fn new(context: &RequestContext, output: QueryOutput) -> Self {
        Self {
            status: SUCCESS,
            requested_at: context.requested_at,
            results: output.data.len(),
            pagination: output.pagination,
            data: output.data,
        }
    }
}

/// Single record response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleEnvelope {
    pub status: &'static str,
    pub requested_at: DateTime<Utc>,
    pub data: Record,
}

impl SingleEnvelope {
    pub fn new(context: &RequestContext, data: Record) -> Self {
        Self {
            status: SUCCESS,
            requested_at: context.requested_at,
            data,
        }
    }
}

/// Grouping response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEnvelope {
    pub status: &'static str,
    pub requested_at: DateTime<Utc>,
    pub results: usize,
    pub data: Vec<Group>,
}

impl GroupEnvelope {
    pub fn new(context: &RequestContext, groups: Vec<Group>) -> Self {
        Self {
            status: SUCCESS,
            requested_at: context.requested_at,
            results: groups.len(),
            data: groups,
        }
    }
}
