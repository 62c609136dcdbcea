//! Grouping of records by one field.
//!
//! Array fields are unwound: a record contributes one occurrence to the group
//! of every element it holds.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::query::path;
use crate::query::{
    FilterSpec, Operator, ProjectionSpec, QueryError, QueryResult, QuerySpec, SortSpec,
};
use crate::store::matcher::compare_values;
use crate::store::{identity_string, Collection};

/// Records sharing one field value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub value: Value,
    /// Occurrences of the value
    pub count: u64,
    /// Distinct identities holding the value, sorted
    pub ids: Vec<String>,
}

struct GroupAccumulator {
    value: Value,
    count: u64,
    ids: BTreeSet<String>,
}

/// Group a collection by `field`, largest groups first
pub async fn group_by<C>(collection: &C, field: &str) -> QueryResult<Vec<Group>>
where
    C: Collection + ?Sized,
{
    let policy = collection.policy();
    let hidden = policy.hidden_fields.iter().any(|h| {
        field == h.as_str() || field.strip_prefix(h.as_str()).is_some_and(|rest| rest.starts_with('.'))
    });
    if hidden || !policy.admit(field, Operator::Equal)? {
        return Err(QueryError::UnknownField(field.to_string()));
    }

    let identity = policy.identity_field.as_str();
    let spec = QuerySpec::new(
        FilterSpec::all(),
        SortSpec::by_identity(identity),
        ProjectionSpec::include(vec![identity.to_string(), field.to_string()]),
        None,
    );
    let records = collection.find(&spec).await?;

    let mut accumulators: Vec<GroupAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in &records {
        let Some(id) = path::lookup(record, identity).and_then(identity_string) else {
            continue;
        };
        let values: Vec<&Value> = match path::lookup(record, field) {
            None => continue,
            Some(Value::Array(items)) => items.iter().collect(),
            Some(value) => vec![value],
        };

        for value in values {
            let slot = *index.entry(value.to_string()).or_insert_with(|| {
                accumulators.push(GroupAccumulator {
                    value: value.clone(),
                    count: 0,
                    ids: BTreeSet::new(),
                });
                accumulators.len() - 1
            });
            let group = &mut accumulators[slot];
            group.count += 1;
            group.ids.insert(id.clone());
        }
    }

    let mut groups: Vec<Group> = accumulators
        .into_iter()
        .map(|acc| Group {
            value: acc.value,
            count: acc.count,
            ids: acc.ids.into_iter().collect(),
        })
        .collect();

    groups.sort_by(|a, b| {
        b.count.cmp(&a.count).then_with(|| {
            compare_values(&a.value, &b.value)
                .unwrap_or_else(|| a.value.to_string().cmp(&b.value.to_string()))
        })
    });

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryPolicy;
    use crate::store::InMemoryCollection;
    use serde_json::json;

    fn collection() -> InMemoryCollection {
        InMemoryCollection::new(
            "slimes",
            QueryPolicy::default(),
            vec![
                json!({"id": "tabby", "type": "docile", "locations": ["fields", "valley"]}),
                json!({"id": "pink", "type": "docile", "locations": ["fields", "valley", "reef"]}),
                json!({"id": "tarr", "type": "hostile"}),
                json!({"id": "rock", "type": "docile", "locations": ["quarry", "fields"]}),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_group_unwinds_arrays() {
        let groups = group_by(&collection(), "locations").await.unwrap();

        assert_eq!(groups[0].value, json!("fields"));
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[0].ids, ["pink", "rock", "tabby"]);
        assert_eq!(groups[1].value, json!("valley"));
        assert_eq!(groups[1].count, 2);

        // Ties ordered by value
        let tail: Vec<&Value> = groups[2..].iter().map(|g| &g.value).collect();
        assert_eq!(tail, [&json!("quarry"), &json!("reef")]);
    }

    #[tokio::test]
    async fn test_group_scalar_field() {
        let groups = group_by(&collection(), "type").await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].value, json!("docile"));
        assert_eq!(groups[0].count, 3);
        assert_eq!(groups[1].ids, ["tarr"]);
    }

    #[tokio::test]
    async fn test_group_hidden_field_rejected() {
        let collection = InMemoryCollection::new(
            "slimes",
            QueryPolicy::default(),
            vec![json!({"id": "pink", "__v": 0})],
        )
        .unwrap();
        assert_eq!(
            group_by(&collection, "__v").await,
            Err(QueryError::UnknownField("__v".to_string()))
        );
    }

    #[tokio::test]
    async fn test_group_unknown_field_rejected() {
        let policy = QueryPolicy {
            unknown_fields: crate::query::UnknownFieldPolicy::Reject,
            ..Default::default()
        };
        let collection = InMemoryCollection::new("slimes", policy, vec![]).unwrap();
        assert_eq!(
            group_by(&collection, "secret").await,
            Err(QueryError::UnknownField("secret".to_string()))
        );
    }
}
