//! SQL Dialect definitions and formatting rules.
//!
//! Composed statements only differ between dialects in how literals and
//! identifiers are written:
//!
//! | Dialect | String literals | Identifiers | Placeholders |
//! |---------|-----------------|-------------|--------------|
//! | Legacy | `'...'`, no escaping | as written | `$n` |
//! | Postgres | `'...'`, `'` doubled | quoted when not plain | `$n` |
//! | Redshift | `'...'`, `'` doubled | quoted when not plain | `$n` |
//!
//! For plain identifiers and values without quotes all three produce the
//! same text.
//!
//! # Usage
//!
//! ```ignore
//! use sqlcompose::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_string("O'Brien");  // 'O''Brien'
//! ```

pub mod helpers;
mod legacy;
mod postgres;
mod redshift;

pub use legacy::Legacy;
pub use postgres::Postgres;
pub use redshift::Redshift;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// SQL dialect trait - defines how literals and identifiers are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (schema, table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// The default doubles embedded single quotes.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Placeholder for the `n`th bound parameter (1-based).
    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_dollar(n)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Historical output: literals and identifiers written verbatim.
    Legacy,
    #[default]
    Postgres,
    Redshift,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Legacy => &Legacy,
            Dialect::Postgres => &Postgres,
            Dialect::Redshift => &Redshift,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn placeholder(&self, n: usize) -> String {
        self.dialect().placeholder(n)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Dialect::Legacy),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "redshift" => Ok(Dialect::Redshift),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
