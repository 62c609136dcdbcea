//! # REST API Errors
//!
//! Maps query and routing failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::query::QueryError;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned in place of internal details
const INTERNAL_MESSAGE: &str = "Something went wrong!";

/// REST API errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Query translation or execution failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// No collection registered under this name
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// No route matched the request path
    #[error("Cannot find {0} on this server.")]
    RouteNotFound(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Query(QueryError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Query(QueryError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::CollectionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Query(err) => err.code(),
            ApiError::CollectionNotFound(_) => "COLLECTION_NOT_FOUND",
            ApiError::RouteNotFound(_) => "ROUTE_NOT_FOUND",
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// `fail` for client errors, `error` for server errors
    pub status: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        if err.status_code().is_server_error() {
            Self {
                status: "error",
                code: err.code(),
                message: INTERNAL_MESSAGE.to_string(),
            }
        } else {
            Self {
                status: "fail",
                code: err.code(),
                message: err.to_string(),
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(QueryError::MixedProjection).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(QueryError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(QueryError::StoreUnavailable("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::CollectionNotFound("gordos".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = ApiError::RouteNotFound("/nowhere".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, "fail");
        assert_eq!(body.code, "ROUTE_NOT_FOUND");
        assert_eq!(body.message, "Cannot find /nowhere on this server.");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = ApiError::from(QueryError::StoreUnavailable("disk on fire".to_string()));
        let body = ErrorResponse::from(&err);
        assert_eq!(body.status, "error");
        assert_eq!(body.code, "STORE_UNAVAILABLE");
        assert!(!body.message.contains("disk"));
    }
}
