//! Boolean predicates and row filters.

use serde::{Deserialize, Serialize};

/// A literal compared against a column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(serde_json::Number),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionOptions {
    #[serde(default)]
    pub case_sensitive: bool,
}

/// A single `column <operator> value` comparison.
///
/// The operator is kept as written so that an unknown name surfaces as a
/// compile error rather than a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ConditionOptions>,
}

impl Condition {
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value,
            options: None,
        }
    }

    pub fn case_sensitive(mut self) -> Self {
        self.options = Some(ConditionOptions {
            case_sensitive: true,
        });
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.options.map(|o| o.case_sensitive).unwrap_or(false)
    }
}

/// Predicate tree used inside `cases` clauses.
///
/// Wire form: `{"when": {...}}`, `{"and": [...]}`, `{"or": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    #[serde(rename = "when")]
    Leaf(Condition),
    #[serde(rename = "and")]
    And(Vec<Predicate>),
    #[serde(rename = "or")]
    Or(Vec<Predicate>),
}

/// Predicate tree used by row filters.
///
/// Leaves are bare conditions: `{"column": ..., "operator": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterExpr {
    And { and: Vec<FilterExpr> },
    Or { or: Vec<FilterExpr> },
    Leaf(Condition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMetadata {
    #[serde(rename = "templateType")]
    pub template_type: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

pub const ROW_FILTER_TEMPLATE: &str = "row_filter";

/// A top-level filter carrying the identifier used for override merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    pub metadata: FilterMetadata,
    #[serde(flatten)]
    pub expr: FilterExpr,
}

impl RowFilter {
    pub fn new(identifier: impl Into<String>, expr: FilterExpr) -> Self {
        Self {
            metadata: FilterMetadata {
                template_type: ROW_FILTER_TEMPLATE.to_string(),
                identifier: identifier.into(),
                version: None,
            },
            expr,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.metadata.identifier
    }
}
