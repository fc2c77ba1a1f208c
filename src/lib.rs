//! # sqlcompose
//!
//! Compiles declarative JSON query compositions into SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          Query document (JSON: query | composition)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │             SqlQuery / Composition (Rust Types)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [composer + overrides]
//! ┌─────────────────────────────────────────────────────────┐
//! │  compiler: operators, predicates, cases, intervals       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql::token + sql::dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │             SQL text  |  SQL + bound parameters          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compiler;
pub mod composer;
pub mod config;
pub mod model;
pub mod overrides;
pub mod sql;
pub mod store;
pub mod validation;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{CompileError, CompileOptions, DateZone};
    pub use crate::composer::{ComposeError, Composer, SAMPLE_SCHEMA};
    pub use crate::model::{
        CaseClause, ColumnExpression, Composition, Condition, FilterExpr, Interval,
        ParameterOverrides, Predicate, RowFilter, SqlQuery, ThenValue, Value,
    };
    pub use crate::sql::{BoundSql, Dialect, SqlDialect};
    pub use crate::store::{InMemoryQueryStore, QueryStore, StoreError};
    pub use crate::validation::ValidationError;
}

// Also export at crate root for convenience
pub use composer::{ComposeError, Composer};
pub use model::{Composition, ParameterOverrides, SqlQuery};
pub use sql::Dialect;
