//! # In-Memory Collection
//!
//! Records held in a `RwLock<Vec<Value>>`, loaded from a JSON array file.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::query::path;
use crate::query::{FilterSpec, QueryError, QueryPolicy, QueryResult, QuerySpec};

use super::errors::LoadError;
use super::matcher::CompiledFilter;
use super::sorter::RecordSorter;
use super::{identity_string, Collection, Record};

/// Collection backed by process memory
pub struct InMemoryCollection {
    name: String,
    policy: QueryPolicy,
    records: RwLock<Vec<Value>>,
}

impl InMemoryCollection {
    /// Create a collection from records already in memory
    pub fn new(
        name: impl Into<String>,
        policy: QueryPolicy,
        records: Vec<Value>,
    ) -> Result<Self, LoadError> {
        check_records(&records, &policy.identity_field)?;
        Ok(Self {
            name: name.into(),
            policy,
            records: RwLock::new(records),
        })
    }

    /// Load records from a JSON array file
    pub fn load(
        name: impl Into<String>,
        policy: QueryPolicy,
        data_path: &Path,
    ) -> Result<Self, LoadError> {
        let content = fs::read_to_string(data_path).map_err(|source| LoadError::Read {
            path: data_path.to_path_buf(),
            source,
        })?;

        let parsed: Value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: data_path.to_path_buf(),
            source,
        })?;

        let Value::Array(records) = parsed else {
            return Err(LoadError::NotAnArray);
        };

        Self::new(name, policy, records)
    }

    fn read(&self) -> QueryResult<std::sync::RwLockReadGuard<'_, Vec<Value>>> {
        self.records
            .read()
            .map_err(|_| QueryError::StoreUnavailable(format!("collection '{}' lock poisoned", self.name)))
    }
}

/// Every record is an object with a unique, non-empty identity
fn check_records(records: &[Value], identity_field: &str) -> Result<(), LoadError> {
    let mut seen = HashSet::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if !record.is_object() {
            return Err(LoadError::NotAnObject { index });
        }
        let id = path::lookup(record, identity_field)
            .and_then(identity_string)
            .ok_or_else(|| LoadError::MissingIdentity {
                index,
                field: identity_field.to_string(),
            })?;
        if !seen.insert(id.clone()) {
            return Err(LoadError::DuplicateIdentity(id));
        }
    }

    Ok(())
}

#[async_trait]
impl Collection for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn policy(&self) -> &QueryPolicy {
        &self.policy
    }

    async fn find(&self, spec: &QuerySpec) -> QueryResult<Vec<Record>> {
        let filter = CompiledFilter::compile(spec.filter(), &self.policy)?;
        let records = self.read()?;

        let mut matched: Vec<&Value> = records.iter().filter(|r| filter.matches(r)).collect();
        RecordSorter::sort(&mut matched, spec.sort());

        let (skip, take) = match spec.pagination() {
            Some(pagination) => (
                usize::try_from(pagination.skip()).unwrap_or(usize::MAX),
                usize::try_from(pagination.limit()).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|r| spec.projection().apply(r))
            .collect())
    }

    async fn count_documents(&self, filter: &FilterSpec) -> QueryResult<u64> {
        let filter = CompiledFilter::compile(filter, &self.policy)?;
        let records = self.read()?;

        Ok(records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn find_by_id(&self, id: &str) -> QueryResult<Option<Record>> {
        let records = self.read()?;

        Ok(records
            .iter()
            .find(|r| {
                path::lookup(r, &self.policy.identity_field)
                    .and_then(identity_string)
                    .is_some_and(|candidate| candidate == id)
            })
            .cloned())
    }
}
