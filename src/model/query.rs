//! Stored query documents: a raw SQL string or a composition.

use serde::{Deserialize, Serialize};

use super::composition::{Composition, ParameterOverrides};
use crate::composer::{ComposeResult, Composer, SAMPLE_SCHEMA};
use crate::validation::{self, ValidationError};

/// Wire form of a stored query.
///
/// Exactly one of `query` and `composition` must be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SqlQueryDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<Composition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    /// Returned verbatim by compose.
    Raw(String),
    Composition(Composition),
}

/// A validated stored query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SqlQueryDocument", into = "SqlQueryDocument")]
pub struct SqlQuery {
    pub source: QuerySource,
    pub description: Option<String>,
}

impl SqlQuery {
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            source: QuerySource::Raw(sql.into()),
            description: None,
        }
    }

    pub fn composed(composition: Composition) -> Self {
        Self {
            source: QuerySource::Composition(composition),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Vec<ValidationError>> {
        Self::from_json_with_depth(json, validation::DEFAULT_MAX_DEPTH)
    }

    /// Parse and validate a JSON document, allowing `max_depth` levels of
    /// predicate nesting.
    pub fn from_json_with_depth(json: &str, max_depth: usize) -> Result<Self, Vec<ValidationError>> {
        let document: SqlQueryDocument = serde_json::from_str(json)
            .map_err(|e| vec![ValidationError::Malformed(e.to_string())])?;
        Self::from_document_with_depth(document, max_depth)
    }

    /// Validate a document and convert it into a query.
    pub fn from_document(document: SqlQueryDocument) -> Result<Self, Vec<ValidationError>> {
        Self::from_document_with_depth(document, validation::DEFAULT_MAX_DEPTH)
    }

    pub fn from_document_with_depth(
        document: SqlQueryDocument,
        max_depth: usize,
    ) -> Result<Self, Vec<ValidationError>> {
        validation::validate_document(&document, max_depth)?;
        let source = match (document.query, document.composition) {
            (Some(sql), None) => QuerySource::Raw(sql),
            (None, Some(composition)) => QuerySource::Composition(composition),
            _ => return Err(vec![ValidationError::AmbiguousSource]),
        };
        Ok(Self {
            source,
            description: document.description,
        })
    }

    pub fn composition(&self) -> Option<&Composition> {
        match &self.source {
            QuerySource::Composition(c) => Some(c),
            QuerySource::Raw(_) => None,
        }
    }

    pub fn composition_mut(&mut self) -> Option<&mut Composition> {
        match &mut self.source {
            QuerySource::Composition(c) => Some(c),
            QuerySource::Raw(_) => None,
        }
    }

    /// Compose SQL for `schema` with the default compile options.
    pub fn compose(&self, schema: &str, parameters: &ParameterOverrides) -> ComposeResult<String> {
        Composer::default().compose(self, Some(schema), parameters)
    }

    /// Compose against the placeholder schema with no overrides.
    pub fn sample(&self) -> ComposeResult<String> {
        self.compose(SAMPLE_SCHEMA, &ParameterOverrides::default())
    }
}

impl TryFrom<SqlQueryDocument> for SqlQuery {
    type Error = String;

    fn try_from(document: SqlQueryDocument) -> Result<Self, Self::Error> {
        Self::from_document(document).map_err(|errors| validation::summarize(&errors))
    }
}

impl From<SqlQuery> for SqlQueryDocument {
    fn from(query: SqlQuery) -> Self {
        let (raw, composition) = match query.source {
            QuerySource::Raw(sql) => (Some(sql), None),
            QuerySource::Composition(c) => (None, Some(c)),
        };
        SqlQueryDocument {
            query: raw,
            composition,
            description: query.description,
        }
    }
}
