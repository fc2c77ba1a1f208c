//! Shared helper functions for SQL dialect implementations.
//!
//! Dialects compose these to implement `SqlDialect` with minimal duplication.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// Identifier Quoting
// =============================================================================

static PLAIN_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").unwrap());

/// Whether an identifier can be emitted without quotes.
pub fn is_plain_identifier(ident: &str) -> bool {
    PLAIN_IDENTIFIER.is_match(ident)
}

/// Quote identifier with double quotes (ANSI style).
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Emit plain identifiers as-is; quote anything else with double quotes.
///
/// Dotted references (`t.col`) are quoted part by part so that qualified
/// column names keep their meaning.
/// Used by: Postgres, Redshift
pub fn quote_double_if_needed(ident: &str) -> String {
    if ident.split('.').all(is_plain_identifier) {
        return ident.to_string();
    }
    if ident.contains('"') || !ident.split('.').all(|part| !part.is_empty()) {
        return quote_double(ident);
    }
    ident
        .split('.')
        .map(|part| {
            if is_plain_identifier(part) {
                part.to_string()
            } else {
                quote_double(part)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: Postgres, Redshift
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Wrap in single quotes without escaping.
/// Used by: Legacy
pub fn quote_string_verbatim(s: &str) -> String {
    format!("'{}'", s)
}

// =============================================================================
// Placeholders
// =============================================================================

/// Positional `$n` placeholder (1-based).
pub fn placeholder_dollar(n: usize) -> String {
    format!("${}", n)
}
