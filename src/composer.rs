//! End-to-end composition of stored queries into SQL.
//!
//! ```text
//! SqlQuery + schema + overrides
//!     → effective interval and row filters
//!     → select list, FROM, WHERE
//!     → SQL text (or SQL + bound parameters)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sqlcompose::composer::Composer;
//! use sqlcompose::model::{ParameterOverrides, SqlQuery};
//!
//! let query = SqlQuery::from_json(r#"{
//!     "composition": {
//!         "table": "performance_cube_filtered",
//!         "columns": { "spend": { "sql": "spend" } },
//!         "parameters": { "interval": { "unit": "day", "value": 30 } }
//!     }
//! }"#)?;
//!
//! let sql = Composer::default().compose(&query, Some("acme"), &ParameterOverrides::default())?;
//! ```

use crate::compiler::predicate::compile_row_filter;
use crate::compiler::{compile_cases, compile_interval, CompileError, CompileOptions};
use crate::model::{ColumnExpression, Composition, ParameterOverrides, QuerySource, SqlQuery};
use crate::overrides;
use crate::sql::{BoundSql, Token, TokenStream};
use crate::validation::{self, ValidationError};

/// Schema used when rendering a sample of a query that has no tenant.
pub const SAMPLE_SCHEMA: &str = "<<SAMPLE>>";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while composing a query.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Query composition error: {0}")]
    Composition(String),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Invalid parameters: {}", validation::summarize(.0))]
    Validation(Vec<ValidationError>),
}

pub type ComposeResult<T> = Result<T, ComposeError>;

// ============================================================================
// Composer
// ============================================================================

/// Turns stored queries into SQL using a fixed set of compile options.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    options: CompileOptions,
}

impl Composer {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compose SQL text.
    ///
    /// A raw query is returned unchanged. Otherwise `schema` (or the schema
    /// embedded in the composition) qualifies the table.
    pub fn compose(
        &self,
        query: &SqlQuery,
        schema: Option<&str>,
        parameters: &ParameterOverrides,
    ) -> ComposeResult<String> {
        let composition = match &query.source {
            QuerySource::Raw(sql) => return Ok(sql.clone()),
            QuerySource::Composition(c) => c,
        };

        let (schema, tokens) = self.compose_tokens(composition, schema, parameters)?;
        let sql = tokens.serialize(self.options.dialect);
        tracing::debug!(
            schema = %schema,
            dialect = %self.options.dialect,
            sql = %sql,
            "Composed query"
        );
        Ok(sql)
    }

    /// Compose SQL with caller-supplied string literals bound as parameters.
    pub fn compose_bound(
        &self,
        query: &SqlQuery,
        schema: Option<&str>,
        parameters: &ParameterOverrides,
    ) -> ComposeResult<BoundSql> {
        let composition = match &query.source {
            QuerySource::Raw(sql) => {
                return Ok(BoundSql {
                    sql: sql.clone(),
                    params: vec![],
                })
            }
            QuerySource::Composition(c) => c,
        };

        let (schema, tokens) = self.compose_tokens(composition, schema, parameters)?;
        let bound = tokens.bind(self.options.dialect);
        tracing::debug!(
            schema = %schema,
            dialect = %self.options.dialect,
            sql = %bound.sql,
            params = bound.params.len(),
            "Composed bound query"
        );
        Ok(bound)
    }

    /// Validate overrides before composing with them.
    pub fn compose_checked(
        &self,
        query: &SqlQuery,
        schema: Option<&str>,
        parameters: &ParameterOverrides,
    ) -> ComposeResult<String> {
        validation::validate_overrides(parameters, self.options.max_depth)
            .map_err(ComposeError::Validation)?;
        self.compose(query, schema, parameters)
    }

    /// Build the statement tokens for a composition.
    ///
    /// Returns the schema that was used alongside the tokens.
    pub fn compose_tokens<'a>(
        &self,
        composition: &'a Composition,
        schema: Option<&'a str>,
        parameters: &ParameterOverrides,
    ) -> ComposeResult<(&'a str, TokenStream)> {
        let schema = schema
            .filter(|s| !s.is_empty())
            .or_else(|| composition.schema.as_deref().filter(|s| !s.is_empty()))
            .ok_or_else(|| ComposeError::Composition("no schema defined".into()))?;

        if composition.columns.is_empty() {
            return Err(ComposeError::Composition("no columns defined".into()));
        }

        let defaults = &composition.parameters;
        let interval = match &parameters.interval {
            Some(explicit) => explicit.as_ref(),
            None => defaults.interval.as_ref(),
        };
        let row_filters = overrides::resolve(
            parameters.row_filters.as_deref().unwrap_or_default(),
            &defaults.row_filters,
        );

        let mut ts = TokenStream::new();
        ts.push(Token::Select).space();
        ts.append(&self.select_list(composition)?);
        ts.space()
            .push(Token::From)
            .space()
            .push(Token::QualifiedIdent {
                schema: schema.to_string(),
                name: composition.table.clone(),
            });

        let mut conditions = Vec::with_capacity(row_filters.len() + 1);
        let date_filter = compile_interval(interval, &self.options);
        if !date_filter.is_empty() {
            conditions.push(date_filter);
        }
        for filter in &row_filters {
            conditions.push(compile_row_filter(filter, self.options.max_depth)?);
        }

        for (i, condition) in conditions.iter().enumerate() {
            ts.space()
                .push(if i == 0 { Token::Where } else { Token::And })
                .space()
                .append(condition);
        }

        Ok((schema, ts))
    }

    fn select_list(&self, composition: &Composition) -> ComposeResult<TokenStream> {
        let mut ts = TokenStream::new();
        for (i, (name, column)) in composition.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            match column {
                ColumnExpression::Raw { sql } => {
                    ts.push(Token::Raw(sql.clone()));
                }
                ColumnExpression::Cased { cases } => {
                    ts.append(&compile_cases(cases, self.options.max_depth)?)
                        .space()
                        .push(Token::As)
                        .space()
                        .push(Token::Ident(name.clone()));
                }
            }
        }
        Ok(ts)
    }
}
