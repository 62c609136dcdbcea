//! # Operator Table
//!
//! The closed set of comparison operators accepted in `field[op]` keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Equals (the default when no token is given)
    #[serde(rename = "eq")]
    Equal,

    /// Not equals
    #[serde(rename = "ne")]
    NotEqual,

    /// Greater than
    #[serde(rename = "gt")]
    GreaterThan,

    /// Greater than or equal
    #[serde(rename = "gte")]
    GreaterOrEqual,

    /// Less than
    #[serde(rename = "lt")]
    LessThan,

    /// Less than or equal
    #[serde(rename = "lte")]
    LessOrEqual,

    /// Value in list
    #[serde(rename = "in")]
    IncludedIn,

    /// Value not in list
    #[serde(rename = "nin")]
    NotIncludedIn,
}

impl Operator {
    /// Every operator, in table order
    pub const ALL: [Operator; 8] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterOrEqual,
        Operator::LessThan,
        Operator::LessOrEqual,
        Operator::IncludedIn,
        Operator::NotIncludedIn,
    ];

    /// Look up an operator by its bracket token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(Operator::Equal),
            "ne" => Some(Operator::NotEqual),
            "gt" => Some(Operator::GreaterThan),
            "gte" => Some(Operator::GreaterOrEqual),
            "lt" => Some(Operator::LessThan),
            "lte" => Some(Operator::LessOrEqual),
            "in" => Some(Operator::IncludedIn),
            "nin" => Some(Operator::NotIncludedIn),
            _ => None,
        }
    }

    /// Get the token representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::GreaterThan => "gt",
            Operator::GreaterOrEqual => "gte",
            Operator::LessThan => "lt",
            Operator::LessOrEqual => "lte",
            Operator::IncludedIn => "in",
            Operator::NotIncludedIn => "nin",
        }
    }

    /// Whether the operator takes a list of values
    pub fn is_list(&self) -> bool {
        matches!(self, Operator::IncludedIn | Operator::NotIncludedIn)
    }

    /// Whether the operator orders values rather than testing equality
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterOrEqual
                | Operator::LessThan
                | Operator::LessOrEqual
        )
    }

    /// Whether a match on any array element counts as a miss
    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::NotEqual | Operator::NotIncludedIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
