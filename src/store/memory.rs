//! In-memory query store backed by a concurrent map.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{QueryStore, StoreError, StoreResult, StoredQuery};
use crate::model::SqlQuery;

#[derive(Debug, Default)]
pub struct InMemoryQueryStore {
    queries: DashMap<String, SqlQuery>,
}

impl InMemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl QueryStore for InMemoryQueryStore {
    fn create(&self, path: &str, query: SqlQuery) -> StoreResult<StoredQuery> {
        match self.queries.entry(path.to_string()) {
            Entry::Occupied(_) => Err(StoreError::duplicate_path(path)),
            Entry::Vacant(slot) => {
                slot.insert(query.clone());
                tracing::debug!(path = %path, "Created query");
                Ok(StoredQuery {
                    path: path.to_string(),
                    query,
                })
            }
        }
    }

    fn get(&self, path: &str) -> Option<StoredQuery> {
        self.queries.get(path).map(|entry| StoredQuery {
            path: path.to_string(),
            query: entry.value().clone(),
        })
    }

    fn replace(&self, path: &str, query: SqlQuery) -> StoreResult<StoredQuery> {
        let mut existing = self
            .queries
            .get_mut(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        *existing = query.clone();
        tracing::debug!(path = %path, "Replaced query");
        Ok(StoredQuery {
            path: path.to_string(),
            query,
        })
    }

    fn delete(&self, path: &str) -> StoreResult<StoredQuery> {
        let (path, query) = self
            .queries
            .remove(path)
            .ok_or_else(|| StoreError::not_found(path))?;
        tracing::debug!(path = %path, "Deleted query");
        Ok(StoredQuery { path, query })
    }

    fn list_prefix(&self, prefix: &str) -> Vec<StoredQuery> {
        let mut found: Vec<StoredQuery> = self
            .queries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| StoredQuery {
                path: entry.key().clone(),
                query: entry.value().clone(),
            })
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        found
    }

    fn delete_prefix(&self, prefix: &str) -> usize {
        // Collect first so no shard lock is held while removing.
        let paths: Vec<String> = self
            .queries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = paths
            .iter()
            .filter(|path| self.queries.remove(path.as_str()).is_some())
            .count();
        tracing::debug!(prefix = %prefix, removed, "Deleted queries by prefix");
        removed
    }
}
