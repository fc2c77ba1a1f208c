//! Compilation of composition expressions to SQL tokens.
//!
//! ```text
//! Condition ─▶ operators ─┐
//! Predicate / FilterExpr ─▶ predicate ─┬─▶ TokenStream ─▶ Dialect ─▶ SQL
//! CaseClause[] ─▶ case ───────────────┤
//! Interval ─▶ interval ───────────────┘
//! ```
//!
//! Every function here is pure. Serialization to text (or binding of string
//! literals) happens once, at the end, in the composer.

pub mod case;
pub mod interval;
pub mod operators;
pub mod predicate;

pub use case::compile_cases;
pub use interval::{compile_interval, DateZone};
pub use operators::{compile_condition, Operator};
pub use predicate::{compile_predicate, BooleanNode, Node};

use crate::sql::Dialect;

/// Default limit on `and`/`or` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default column the interval filter applies to.
pub const DEFAULT_DATE_COLUMN: &str = "daily_cohort";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during compilation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Operator '{0}' requires a value")]
    MissingValue(String),

    #[error("Expression nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}

pub type CompileResult<T> = Result<T, CompileError>;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// SQL dialect to generate.
    pub dialect: Dialect,
    /// Column the interval filter compares against.
    pub date_column: String,
    /// Zone whose calendar date a range bound falls on.
    pub date_zone: DateZone,
    /// Maximum `and`/`or` nesting accepted in a predicate.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            date_zone: DateZone::Local,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = column.into();
        self
    }

    pub fn with_date_zone(mut self, zone: DateZone) -> Self {
        self.date_zone = zone;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
