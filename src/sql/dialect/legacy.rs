//! Legacy dialect.
//!
//! Reproduces the text the query service always produced: string literals
//! are wrapped in single quotes without escaping and identifiers are written
//! exactly as authored. Use only with trusted compositions or together with
//! bound parameters.

use super::helpers;
use super::SqlDialect;

/// Verbatim dialect.
#[derive(Debug, Clone, Copy)]
pub struct Legacy;

impl SqlDialect for Legacy {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        ident.to_string()
    }

    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_verbatim(s)
    }
}
