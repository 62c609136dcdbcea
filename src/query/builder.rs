//! # Query Builder
//!
//! Turns [`RawParameters`] into a [`QuerySpec`].
//!
//! Each step reads only the parameters it owns and returns a new builder, so
//! steps can run in any order and a step that is skipped leaves its default:
//! match-all filter, store order, every field, no page window.

use super::errors::{QueryError, QueryResult};
use super::fields::QueryPolicy;
use super::operator::Operator;
use super::params::{is_reserved, RawParameters};
use super::spec::{
    FilterSpec, FilterValue, PaginationSpec, Predicate, ProjectionSpec, QuerySpec, SortKey,
    SortSpec,
};

/// Immutable, step-wise query builder
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    params: &'a RawParameters,
    policy: &'a QueryPolicy,
    filter: FilterSpec,
    sort: SortSpec,
    projection: ProjectionSpec,
    pagination: Option<PaginationSpec>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(params: &'a RawParameters, policy: &'a QueryPolicy) -> Self {
        Self {
            params,
            policy,
            filter: FilterSpec::all(),
            sort: SortSpec::natural(),
            projection: ProjectionSpec::default(),
            pagination: None,
        }
    }

    /// Apply the filter parameters
    pub fn filter(self) -> QueryResult<Self> {
        let filter = parse_filter(self.params, self.policy)?;
        Ok(Self { filter, ..self })
    }

    /// Apply `sort`, or the identity default
    pub fn sort(self) -> Self {
        let sort = parse_sort(self.params, self.policy);
        Self { sort, ..self }
    }

    /// Apply `fields`, or the hidden-field default
    pub fn project(self) -> QueryResult<Self> {
        let projection = parse_projection(self.params, self.policy)?;
        Ok(Self { projection, ..self })
    }

    /// Apply `page` and `limit`
    pub fn paginate(self) -> QueryResult<Self> {
        let pagination = parse_pagination(self.params, self.policy)?;
        Ok(Self {
            pagination: Some(pagination),
            ..self
        })
    }

    pub fn build(self) -> QuerySpec {
        QuerySpec::new(self.filter, self.sort, self.projection, self.pagination)
    }
}

impl QuerySpec {
    /// Filter, sort, project and paginate in one pass
    pub fn from_params(params: &RawParameters, policy: &QueryPolicy) -> QueryResult<Self> {
        Ok(QueryBuilder::new(params, policy)
            .filter()?
            .sort()
            .project()?
            .paginate()?
            .build())
    }
}

// ==================
// Filtering
// ==================

/// Split `field` / `field[op]` into its parts
pub fn parse_filter_key(key: &str) -> QueryResult<(&str, Operator)> {
    let invalid = || QueryError::InvalidFilterKey(key.to_string());

    let (field, token) = match key.find('[') {
        None => {
            if key.contains(']') {
                return Err(invalid());
            }
            (key, None)
        }
        Some(open) => {
            let token = key[open + 1..].strip_suffix(']').ok_or_else(invalid)?;
            (&key[..open], Some(token))
        }
    };

    if field.is_empty() || field.starts_with('$') || field.contains(']') {
        return Err(invalid());
    }

    let operator = match token {
        None => Operator::Equal,
        Some(token) if token.contains('[') || token.contains(']') => return Err(invalid()),
        Some(token) => Operator::from_token(token).ok_or_else(|| QueryError::InvalidOperator {
            field: field.to_string(),
            token: token.to_string(),
        })?,
    };

    Ok((field, operator))
}

/// Build the predicate list from every non-reserved parameter
pub fn parse_filter(params: &RawParameters, policy: &QueryPolicy) -> QueryResult<FilterSpec> {
    let mut predicates: Vec<Predicate> = Vec::new();

    for (key, value) in params.iter() {
        if is_reserved(key) {
            continue;
        }

        let (field, operator) = parse_filter_key(key)?;
        if !policy.admit(field, operator)? {
            continue;
        }

        let position = predicates
            .iter()
            .position(|p| p.field == field && p.operator == operator);

        match position {
            Some(index) => match &mut predicates[index].value {
                FilterValue::List(values) => values.extend(split_list(value)),
                // Repeated scalar keys: last one wins
                single => *single = FilterValue::Single(value.to_string()),
            },
            None => {
                let value = if operator.is_list() {
                    FilterValue::List(split_list(value).collect())
                } else {
                    FilterValue::Single(value.to_string())
                };
                predicates.push(Predicate::new(field, operator, value));
            }
        }
    }

    Ok(FilterSpec::new(predicates))
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

// ==================
// Sorting
// ==================

/// Parse `sort=-name,type`; blank or absent falls back to the identity field
pub fn parse_sort(params: &RawParameters, policy: &QueryPolicy) -> SortSpec {
    let mut keys: Vec<SortKey> = Vec::new();

    for item in params.get("sort").unwrap_or_default().split(',') {
        let item = item.trim();
        let key = match item.strip_prefix('-') {
            Some(field) => SortKey::desc(field.trim()),
            None => SortKey::asc(item),
        };
        if key.field.is_empty() || keys.iter().any(|k| k.field == key.field) {
            continue;
        }
        keys.push(key);
    }

    if keys.is_empty() {
        SortSpec::by_identity(&policy.identity_field)
    } else {
        SortSpec::new(keys)
    }
}

// ==================
// Projection
// ==================

/// Parse `fields=name,diet` (include) or `fields=-image` (exclude)
pub fn parse_projection(
    params: &RawParameters,
    policy: &QueryPolicy,
) -> QueryResult<ProjectionSpec> {
    let items: Vec<&str> = params
        .get("fields")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty() && *item != "-")
        .collect();

    let default = || ProjectionSpec::exclude(policy.hidden_fields.clone());

    if items.is_empty() {
        return Ok(default());
    }

    let excluded = items.iter().filter(|item| item.starts_with('-')).count();

    if excluded == items.len() {
        let mut fields = policy.hidden_fields.clone();
        fields.extend(items.iter().map(|item| item[1..].trim().to_string()));
        return Ok(ProjectionSpec::exclude(fields));
    }

    if excluded > 0 {
        return Err(QueryError::MixedProjection);
    }

    let included: Vec<String> = items
        .into_iter()
        .filter(|item| !policy.hidden_fields.iter().any(|hidden| hidden.as_str() == *item))
        .map(str::to_string)
        .collect();

    if included.is_empty() {
        Ok(default())
    } else {
        Ok(ProjectionSpec::include(included))
    }
}

// ==================
// Pagination
// ==================

/// Parse `page` and `limit`; both must be positive integers when present
pub fn parse_pagination(
    params: &RawParameters,
    policy: &QueryPolicy,
) -> QueryResult<PaginationSpec> {
    let page = parse_positive(params, "page")?.unwrap_or(1);
    let limit = parse_positive(params, "limit")?.unwrap_or(policy.default_limit);

    if limit > policy.max_limit {
        return Err(QueryError::LimitExceeded(limit, policy.max_limit));
    }

    PaginationSpec::new(page, limit).ok_or_else(|| QueryError::InvalidPaginationValue {
        param: "page",
        value: page.to_string(),
    })
}

fn parse_positive(params: &RawParameters, param: &'static str) -> QueryResult<Option<u64>> {
    let Some(raw) = params.get(param) else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(QueryError::InvalidPaginationValue {
            param,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fields::{FieldDef, FieldMap, FieldType, UnknownFieldPolicy};
    use crate::query::spec::{ProjectionMode, SortDirection};

    fn policy() -> QueryPolicy {
        let mut fields = FieldMap::new();
        for name in ["id", "name", "diet", "type"] {
            fields.insert(name.to_string(), FieldDef::Typed(FieldType::String));
        }
        fields.insert("locations".to_string(), FieldDef::Typed(FieldType::StringArray));
        fields.insert("games".to_string(), FieldDef::Typed(FieldType::NumberArray));
        QueryPolicy {
            fields,
            unknown_fields: UnknownFieldPolicy::Reject,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_filter_key() {
        assert_eq!(parse_filter_key("diet").unwrap(), ("diet", Operator::Equal));
        assert_eq!(
            parse_filter_key("games[gte]").unwrap(),
            ("games", Operator::GreaterOrEqual)
        );
        assert!(matches!(
            parse_filter_key("x[bogus]"),
            Err(QueryError::InvalidOperator { .. })
        ));
    }

    #[test]
    fn test_malformed_filter_keys() {
        for key in ["[gte]", "games[gte", "games]", "games[gte]]", "games[[gte]]", "$where"] {
            assert!(
                matches!(parse_filter_key(key), Err(QueryError::InvalidFilterKey(_))),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn test_equal_is_default() {
        let params = RawParameters::parse("diet=meat");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(filter.predicates(), [Predicate::eq("diet", "meat")]);
    }

    #[test]
    fn test_operator_value_stays_raw() {
        let params = RawParameters::parse("games[gte]=2");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(
            filter.predicates(),
            [Predicate::new(
                "games",
                Operator::GreaterOrEqual,
                FilterValue::Single("2".to_string())
            )]
        );
    }

    #[test]
    fn test_reserved_keys_never_filter() {
        let params = RawParameters::parse("page=2&sort=name&limit=3&fields=name&diet=meat");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.predicates()[0].field, "diet");
    }

    #[test]
    fn test_reserved_keys_with_operator_never_filter() {
        let params =
            RawParameters::parse("page[gte]=2&limit[lt]=5&fields[in]=name&sort[bogus]=x&diet=meat");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.predicates()[0].field, "diet");

        let permissive = QueryPolicy::default();
        let filter = parse_filter(&params, &permissive).unwrap();
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn test_list_values_comma_and_repeated() {
        let params = RawParameters::parse("diet[in]=meat,veggie&diet[in]=fruit&type[nin]=hostile");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(filter.len(), 2);
        assert_eq!(
            filter.predicates()[0].value,
            FilterValue::List(vec![
                "meat".to_string(),
                "veggie".to_string(),
                "fruit".to_string()
            ])
        );
        assert_eq!(filter.predicates()[1].operator, Operator::NotIncludedIn);
    }

    #[test]
    fn test_repeated_scalar_keeps_last() {
        let params = RawParameters::parse("diet=meat&diet=veggie");
        let filter = parse_filter(&params, &policy()).unwrap();
        assert_eq!(filter.predicates(), [Predicate::eq("diet", "veggie")]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let params = RawParameters::parse("__v=0");
        assert_eq!(
            parse_filter(&params, &policy()),
            Err(QueryError::UnknownField("__v".to_string()))
        );
    }

    #[test]
    fn test_sort() {
        let params = RawParameters::parse("sort=-name,type");
        let sort = parse_sort(&params, &policy());
        assert_eq!(sort.keys(), [SortKey::desc("name"), SortKey::asc("type")]);
    }

    #[test]
    fn test_sort_default_and_blank() {
        let expected = SortSpec::by_identity("id");
        assert_eq!(parse_sort(&RawParameters::new(), &policy()), expected);
        assert_eq!(parse_sort(&RawParameters::parse("sort=,-,"), &policy()), expected);
        assert_eq!(expected.keys()[0].direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_duplicate_keeps_first() {
        let sort = parse_sort(&RawParameters::parse("sort=name,-name"), &policy());
        assert_eq!(sort.keys(), [SortKey::asc("name")]);
    }

    #[test]
    fn test_projection_modes() {
        let policy = policy();

        let default = parse_projection(&RawParameters::new(), &policy).unwrap();
        assert_eq!(default, ProjectionSpec::exclude(vec!["__v".to_string()]));

        let include = parse_projection(&RawParameters::parse("fields=name,diet,__v"), &policy)
            .unwrap();
        assert_eq!(include.mode(), ProjectionMode::Include);
        assert_eq!(include.fields(), ["name".to_string(), "diet".to_string()]);

        let exclude = parse_projection(&RawParameters::parse("fields=-image"), &policy).unwrap();
        assert_eq!(
            exclude,
            ProjectionSpec::exclude(vec!["__v".to_string(), "image".to_string()])
        );

        assert_eq!(
            parse_projection(&RawParameters::parse("fields=name,-image"), &policy),
            Err(QueryError::MixedProjection)
        );
    }

    #[test]
    fn test_pagination() {
        let policy = policy();

        let pagination = parse_pagination(&RawParameters::parse("page=2&limit=6"), &policy).unwrap();
        assert_eq!(pagination.skip(), 6);
        assert_eq!(pagination.limit(), 6);

        let defaults = parse_pagination(&RawParameters::new(), &policy).unwrap();
        assert_eq!((defaults.page(), defaults.limit(), defaults.skip()), (1, 6, 0));
    }

    #[test]
    fn test_invalid_pagination() {
        let policy = policy();
        for query in ["page=0", "page=-1", "page=abc", "limit=0", "limit=1.5", "limit="] {
            assert!(
                matches!(
                    parse_pagination(&RawParameters::parse(query), &policy),
                    Err(QueryError::InvalidPaginationValue { .. })
                ),
                "{query} should be rejected"
            );
        }
        assert_eq!(
            parse_pagination(&RawParameters::parse("limit=1000"), &policy),
            Err(QueryError::LimitExceeded(1000, 100))
        );
    }

    #[test]
    fn test_steps_commute() {
        let params = RawParameters::parse("diet=meat&sort=-name&fields=name&page=2&limit=2");
        let policy = policy();

        let forward = QueryBuilder::new(&params, &policy)
            .filter()
            .unwrap()
            .sort()
            .project()
            .unwrap()
            .paginate()
            .unwrap()
            .build();
        let backward = QueryBuilder::new(&params, &policy)
            .paginate()
            .unwrap()
            .project()
            .unwrap()
            .sort()
            .filter()
            .unwrap()
            .build();

        assert_eq!(forward, backward);
        assert_eq!(forward, QuerySpec::from_params(&params, &policy).unwrap());
    }

    #[test]
    fn test_skipped_steps_keep_defaults() {
        let params = RawParameters::parse("diet=meat&page=3");
        let policy = policy();
        let spec = QueryBuilder::new(&params, &policy).filter().unwrap().build();

        assert!(!spec.is_paginated());
        assert!(spec.sort().is_natural());
        assert_eq!(spec.projection(), &ProjectionSpec::default());
        assert_eq!(spec.filter().len(), 1);
    }
}
