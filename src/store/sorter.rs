//! Record sorting for query execution
//!
//! Multi-key, stable and deterministic.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::path;
use crate::query::{SortDirection, SortSpec};

/// Sorts records by a sort specification
pub struct RecordSorter;

impl RecordSorter {
    /// Sorts records; earlier keys take priority and ties keep input order.
    pub fn sort(records: &mut [&Value], sort_spec: &SortSpec) {
        if sort_spec.is_natural() {
            return;
        }

        records.sort_by(|a, b| {
            for key in sort_spec.keys() {
                let ordering = Self::compare_values(
                    Self::sort_value(a, &key.field, key.direction),
                    Self::sort_value(b, &key.field, key.direction),
                );
                let ordering = match key.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Value a record sorts by for one key.
    ///
    /// An array stands in as its smallest element when ascending and its
    /// largest when descending; an empty array sorts as missing.
    fn sort_value<'a>(
        record: &'a Value,
        field: &str,
        direction: SortDirection,
    ) -> Option<&'a Value> {
        match path::lookup(record, field)? {
            Value::Array(items) => {
                let compare =
                    |x: &&'a Value, y: &&'a Value| Self::compare_values(Some(*x), Some(*y));
                match direction {
                    SortDirection::Ascending => items.iter().min_by(compare),
                    SortDirection::Descending => items.iter().max_by(compare),
                }
            }
            value => Some(value),
        }
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string < array < object
    /// - For same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let type_order = |v: &Value| -> u8 {
            match v {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Array(_) => 4,
                Value::Object(_) => 5,
            }
        };

        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let a_type = type_order(a_val);
                let b_type = type_order(b_val);

                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(a_n), Value::Number(b_n)) => {
                        let a_f = a_n.as_f64().unwrap_or(0.0);
                        let b_f = b_n.as_f64().unwrap_or(0.0);
                        a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                    // Nested arrays compare element-wise
                    (Value::Array(a_arr), Value::Array(b_arr)) => a_arr
                        .iter()
                        .zip(b_arr.iter())
                        .map(|(x, y)| Self::compare_values(Some(x), Some(y)))
                        .find(|o| *o != Ordering::Equal)
                        .unwrap_or_else(|| a_arr.len().cmp(&b_arr.len())),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
