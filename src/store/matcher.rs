//! # Predicate Matching
//!
//! Compiles a [`FilterSpec`] against a collection's field types, then tests
//! records with document-store semantics:
//!
//! - values only compare with values of the same kind
//! - a predicate on an array holds when any element satisfies it
//!   (`ne` / `nin` hold when no element matches)
//! - a missing field satisfies only `ne` and `nin`

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::fields::parse_number;
use crate::query::path;
use crate::query::{FilterSpec, Operator, QueryPolicy, QueryResult};

/// Coerced right-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    /// Coerced once using the declared field type
    Typed(Vec<Value>),
    /// Undeclared field: every reading, picked per stored value kind
    Untyped {
        strings: Vec<Value>,
        numbers: Vec<Value>,
        booleans: Vec<Value>,
    },
}

impl Operand {
    fn untyped(raw: &[String]) -> Self {
        Operand::Untyped {
            strings: raw.iter().map(|r| Value::String(r.clone())).collect(),
            numbers: raw.iter().filter_map(|r| parse_number(r)).collect(),
            booleans: raw
                .iter()
                .filter_map(|r| match r.as_str() {
                    "true" => Some(Value::Bool(true)),
                    "false" => Some(Value::Bool(false)),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Operand values comparable with `stored`
    fn for_value(&self, stored: &Value) -> &[Value] {
        match self {
            Operand::Typed(values) => values,
            Operand::Untyped {
                strings,
                numbers,
                booleans,
            } => match stored {
                Value::Number(_) => numbers,
                Value::Bool(_) => booleans,
                _ => strings,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CompiledPredicate {
    field: String,
    operator: Operator,
    operand: Operand,
}

impl CompiledPredicate {
    fn matches(&self, record: &Value) -> bool {
        let Some(stored) = path::lookup(record, &self.field) else {
            return self.operator.is_negated();
        };

        let hit = match stored {
            Value::Array(items) => items.iter().any(|item| self.holds(item)),
            scalar => self.holds(scalar),
        };

        if self.operator.is_negated() {
            !hit
        } else {
            hit
        }
    }

    /// Positive form of the operator against one stored value
    fn holds(&self, stored: &Value) -> bool {
        let operands = self.operand.for_value(stored);

        match self.operator {
            Operator::Equal
            | Operator::NotEqual
            | Operator::IncludedIn
            | Operator::NotIncludedIn => operands
                .iter()
                .any(|operand| compare_values(stored, operand) == Some(Ordering::Equal)),
            Operator::GreaterThan => self.ordered(stored, operands, |o| o == Ordering::Greater),
            Operator::GreaterOrEqual => self.ordered(stored, operands, |o| o != Ordering::Less),
            Operator::LessThan => self.ordered(stored, operands, |o| o == Ordering::Less),
            Operator::LessOrEqual => self.ordered(stored, operands, |o| o != Ordering::Greater),
        }
    }

    fn ordered(&self, stored: &Value, operands: &[Value], accept: fn(Ordering) -> bool) -> bool {
        operands
            .first()
            .and_then(|operand| compare_values(stored, operand))
            .is_some_and(accept)
    }
}

/// Compare two JSON values of the same kind; `None` across kinds
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64()?;
            let b = b.as_f64()?;
            a.partial_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A filter ready to test records
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    predicates: Vec<CompiledPredicate>,
}

impl CompiledFilter {
    /// Coerce every raw value using the policy's field types.
    ///
    /// Fails with `MalformedFilterValue` before any record is read.
    pub fn compile(filter: &FilterSpec, policy: &QueryPolicy) -> QueryResult<Self> {
        let predicates = filter
            .predicates()
            .iter()
            .map(|predicate| -> QueryResult<CompiledPredicate> {
                let raw = predicate.value.items();
                let operand = match policy.field_type(&predicate.field) {
                    Some(field_type) => Operand::Typed(
                        raw.iter()
                            .map(|r| field_type.coerce(&predicate.field, r))
                            .collect::<QueryResult<Vec<_>>>()?,
                    ),
                    None => Operand::untyped(raw),
                };
                Ok(CompiledPredicate {
                    field: predicate.field.clone(),
                    operator: predicate.operator,
                    operand,
                })
            })
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Self { predicates })
    }

    /// Check if a record matches all predicates
    pub fn matches(&self, record: &Value) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}
