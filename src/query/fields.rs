//! # Field Policy
//!
//! Which fields a collection exposes for filtering, their value types, and
//! how raw parameter strings are coerced into typed JSON values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::errors::{QueryError, QueryResult};
use super::operator::Operator;

/// Stored value type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    StringArray,
    NumberArray,
}

impl FieldType {
    /// Type of a single (array element) value
    pub fn scalar(&self) -> FieldType {
        match self {
            FieldType::StringArray => FieldType::String,
            FieldType::NumberArray => FieldType::Number,
            other => *other,
        }
    }

    /// Operators that make sense for this type
    pub fn default_operators(&self) -> &'static [Operator] {
        match self.scalar() {
            FieldType::Boolean => &[
                Operator::Equal,
                Operator::NotEqual,
                Operator::IncludedIn,
                Operator::NotIncludedIn,
            ],
            _ => &Operator::ALL,
        }
    }

    /// Coerce one raw string to this type's scalar JSON value
    pub fn coerce(&self, field: &str, raw: &str) -> QueryResult<Value> {
        let malformed = || QueryError::MalformedFilterValue {
            field: field.to_string(),
            value: raw.to_string(),
        };

        match self.scalar() {
            FieldType::Number => parse_number(raw).ok_or_else(malformed),
            FieldType::Boolean => match raw {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(malformed()),
            },
            _ => Ok(Value::String(raw.to_string())),
        }
    }
}

/// Parse an integer or finite float
pub fn parse_number(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Declared filterable field: a bare type or a type with an operator list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDef {
    Typed(FieldType),
    Restricted {
        #[serde(rename = "type")]
        field_type: FieldType,
        operators: Vec<Operator>,
    },
}

impl FieldDef {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldDef::Typed(field_type) => *field_type,
            FieldDef::Restricted { field_type, .. } => *field_type,
        }
    }

    pub fn allows(&self, operator: Operator) -> bool {
        match self {
            FieldDef::Typed(field_type) => field_type.default_operators().contains(&operator),
            FieldDef::Restricted { operators, .. } => operators.contains(&operator),
        }
    }
}

/// Exposed field name to definition
pub type FieldMap = BTreeMap<String, FieldDef>;

/// What to do with filters on fields missing from the field map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Fail with `UnknownField`
    #[default]
    Reject,
    /// Drop the predicate
    Ignore,
    /// Keep the predicate untyped
    PassThrough,
}

/// Per-collection rules consulted while building a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicy {
    pub identity_field: String,
    pub hidden_fields: Vec<String>,
    pub default_limit: u64,
    pub max_limit: u64,
    pub fields: FieldMap,
    pub unknown_fields: UnknownFieldPolicy,
}

/// Default records per page
pub const DEFAULT_LIMIT: u64 = 6;

/// Default upper bound on `limit`
pub const MAX_LIMIT: u64 = 100;

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            identity_field: "id".to_string(),
            hidden_fields: vec!["__v".to_string()],
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            fields: FieldMap::new(),
            unknown_fields: UnknownFieldPolicy::PassThrough,
        }
    }
}

impl QueryPolicy {
    /// Declared type of a field, if any
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields.get(field).map(FieldDef::field_type)
    }

    /// Decide whether a `(field, operator)` pair may be filtered on.
    ///
    /// `Ok(false)` means the predicate is silently dropped.
    pub fn admit(&self, field: &str, operator: Operator) -> QueryResult<bool> {
        match self.fields.get(field) {
            Some(def) if def.allows(operator) => Ok(true),
            Some(_) => Err(QueryError::OperatorNotAllowed {
                field: field.to_string(),
                operator: operator.as_str(),
            }),
            None => match self.unknown_fields {
                UnknownFieldPolicy::Reject => Err(QueryError::UnknownField(field.to_string())),
                UnknownFieldPolicy::Ignore => Ok(false),
                UnknownFieldPolicy::PassThrough => Ok(true),
            },
        }
    }
}
