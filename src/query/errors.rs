//! # Query Errors
//!
//! Error taxonomy shared by the query builder, the store and the executor.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query translation and execution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    // ==================
    // Builder Errors
    // ==================
    /// Bracketed operator token outside the operator table
    #[error("Invalid operator '{token}' on field '{field}'")]
    InvalidOperator { field: String, token: String },

    /// Parameter key that is neither `field` nor `field[op]`
    #[error("Invalid filter key: {0}")]
    InvalidFilterKey(String),

    /// Filter on a field the collection does not expose
    #[error("Filtering on field '{0}' is not allowed")]
    UnknownField(String),

    /// Operator not in the field's allow-list
    #[error("Operator '{operator}' is not allowed on field '{field}'")]
    OperatorNotAllowed { field: String, operator: &'static str },

    /// `fields` mixes included and excluded names
    #[error("Projection cannot mix included and excluded fields")]
    MixedProjection,

    /// Non-numeric or non-positive page/limit
    #[error("Invalid value for '{param}': {value} (expected a positive integer)")]
    InvalidPaginationValue { param: &'static str, value: String },

    /// Limit above the collection maximum
    #[error("Limit {0} exceeds maximum {1}")]
    LimitExceeded(u64, u64),

    // ==================
    // Store Errors
    // ==================
    /// Raw filter value cannot be coerced to the field type
    #[error("Invalid {field}: {value}")]
    MalformedFilterValue { field: String, value: String },

    /// The collection could not be reached
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Single-record lookup found nothing
    #[error("No document found with that ID")]
    NotFound,
}

impl QueryError {
    /// Whether the caller's input caused this error
    pub fn is_user_error(&self) -> bool {
        !matches!(self, QueryError::StoreUnavailable(_) | QueryError::NotFound)
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidOperator { .. } => "INVALID_OPERATOR",
            QueryError::InvalidFilterKey(_) => "INVALID_FILTER_KEY",
            QueryError::UnknownField(_) => "UNKNOWN_FIELD",
            QueryError::OperatorNotAllowed { .. } => "OPERATOR_NOT_ALLOWED",
            QueryError::MixedProjection => "MIXED_PROJECTION",
            QueryError::InvalidPaginationValue { .. } => "INVALID_PAGINATION_VALUE",
            QueryError::LimitExceeded(_, _) => "LIMIT_EXCEEDED",
            QueryError::MalformedFilterValue { .. } => "MALFORMED_FILTER_VALUE",
            QueryError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            QueryError::NotFound => "NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        assert!(QueryError::MixedProjection.is_user_error());
        assert!(QueryError::MalformedFilterValue {
            field: "games".to_string(),
            value: "two".to_string(),
        }
        .is_user_error());
        assert!(!QueryError::NotFound.is_user_error());
        assert!(!QueryError::StoreUnavailable("down".to_string()).is_user_error());
    }

    #[test]
    fn test_messages() {
        let err = QueryError::InvalidOperator {
            field: "x".to_string(),
            token: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid operator 'bogus' on field 'x'");
        assert_eq!(err.code(), "INVALID_OPERATOR");
    }
}
