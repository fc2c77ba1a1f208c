//! Storage of queries keyed by path.

mod memory;
pub mod path;

pub use memory::InMemoryQueryStore;
pub use path::{company_prefix, company_query_path, global_query_path, GLOBAL_PREFIX};

use serde::{Deserialize, Serialize};

use crate::model::{CompositionMetadata, SqlQuery};

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Query already exists at path: {path}")]
    DuplicatePath { path: String },

    #[error("Query not found at path: {path}")]
    NotFound { path: String },
}

impl StoreError {
    #[must_use]
    pub fn duplicate_path(path: impl Into<String>) -> Self {
        Self::DuplicatePath { path: path.into() }
    }

    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A query together with the path it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuery {
    pub path: String,
    pub query: SqlQuery,
}

/// Path-keyed query storage.
///
/// Reads return owned snapshots; a replaced document is never observed
/// half-written.
pub trait QueryStore: Send + Sync {
    /// Insert a new query. Fails if `path` is taken.
    fn create(&self, path: &str, query: SqlQuery) -> StoreResult<StoredQuery>;

    fn get(&self, path: &str) -> Option<StoredQuery>;

    /// Replace the whole document at an existing path.
    fn replace(&self, path: &str, query: SqlQuery) -> StoreResult<StoredQuery>;

    fn delete(&self, path: &str) -> StoreResult<StoredQuery>;

    /// Queries whose path starts with `prefix`, sorted by path.
    fn list_prefix(&self, prefix: &str) -> Vec<StoredQuery>;

    /// Remove every query whose path starts with `prefix`; returns the count.
    fn delete_prefix(&self, prefix: &str) -> usize;

    fn list_globals(&self) -> Vec<StoredQuery> {
        self.list_prefix(GLOBAL_PREFIX)
    }

    fn list_by_company(&self, company: &str) -> Vec<StoredQuery> {
        self.list_prefix(&company_prefix(company))
    }

    fn delete_all_by_company(&self, company: &str) -> usize {
        self.delete_prefix(&company_prefix(company))
    }
}

/// Store a global query under `global_queries_<identifier>`.
///
/// Compositions are stamped with `query` template metadata at version 0.
pub fn create_global_query(
    store: &dyn QueryStore,
    identifier: &str,
    mut query: SqlQuery,
) -> StoreResult<StoredQuery> {
    if let Some(composition) = query.composition_mut() {
        composition.metadata = Some(CompositionMetadata::global(
            identifier,
            composition.query_type,
        ));
    }
    store.create(&global_query_path(identifier), query)
}

/// Store a company query under `companies_<company>_queries_<identifier>`.
pub fn create_company_query(
    store: &dyn QueryStore,
    company: &str,
    identifier: &str,
    query: SqlQuery,
) -> StoreResult<StoredQuery> {
    store.create(&company_query_path(company, identifier), query)
}
