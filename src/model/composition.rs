//! Compositions: a table, named output columns and default parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::interval::Interval;
use super::predicate::{Condition, Predicate, RowFilter, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Cube,
}

/// Stamp placed on global compositions by the query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionMetadata {
    pub template_type: String,
    pub query_type: QueryType,
    pub identifier: String,
    #[serde(default)]
    pub version: u64,
}

impl CompositionMetadata {
    pub fn global(identifier: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            template_type: "query".to_string(),
            query_type,
            identifier: identifier.into(),
            version: 0,
        }
    }
}

/// Declarative query definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    #[serde(default)]
    pub table: String,
    /// Output columns in declaration order.
    #[serde(default)]
    pub columns: IndexMap<String, ColumnExpression>,
    #[serde(default)]
    pub query_type: QueryType,
    /// Defaults used when the caller supplies no override.
    #[serde(default)]
    pub parameters: QueryParameters,
    /// Schema used when the caller does not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CompositionMetadata>,
}

impl Composition {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, column: ColumnExpression) -> Self {
        self.columns.insert(name.into(), column);
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.parameters.interval = Some(interval);
        self
    }

    pub fn with_row_filter(mut self, filter: RowFilter) -> Self {
        self.parameters.row_filters.push(filter);
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// How an output column is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnExpression {
    /// SQL fragment emitted as written, e.g. `{"sql": "sum(spend)"}`.
    Raw { sql: String },
    /// Conditional derivation, e.g. `{"cases": [...]}`.
    Cased { cases: Vec<CaseClause> },
}

impl ColumnExpression {
    pub fn raw(sql: impl Into<String>) -> Self {
        ColumnExpression::Raw { sql: sql.into() }
    }

    pub fn cased(cases: Vec<CaseClause>) -> Self {
        ColumnExpression::Cased { cases }
    }
}

/// One branch of a `cases` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CaseClauseRepr", into = "CaseClauseRepr")]
pub enum CaseClause {
    /// `WHEN <condition> THEN <then>`.
    When { condition: Predicate, then: ThenValue },
    /// `ELSE <then>`; the last one in a list wins.
    Default(ThenValue),
}

impl CaseClause {
    pub fn when(condition: Condition, then: ThenValue) -> Self {
        CaseClause::When {
            condition: Predicate::Leaf(condition),
            then,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseClauseRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    when: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    and: Option<Vec<Predicate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    or: Option<Vec<Predicate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    then: Option<ThenValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<ThenValue>,
}

impl TryFrom<CaseClauseRepr> for CaseClause {
    type Error = String;

    fn try_from(repr: CaseClauseRepr) -> Result<Self, Self::Error> {
        let condition = match (repr.when, repr.and, repr.or) {
            (Some(c), None, None) => Some(Predicate::Leaf(c)),
            (None, Some(children), None) => Some(Predicate::And(children)),
            (None, None, Some(children)) => Some(Predicate::Or(children)),
            (None, None, None) => None,
            _ => return Err("case clause may only contain one of 'when', 'and' or 'or'".into()),
        };

        match (condition, repr.then, repr.default) {
            (Some(condition), Some(then), None) => Ok(CaseClause::When { condition, then }),
            (None, None, Some(default)) => Ok(CaseClause::Default(default)),
            (Some(_), None, _) => Err("case clause is missing 'then'".into()),
            (None, Some(_), _) => {
                Err("case clause has 'then' but no 'when', 'and' or 'or'".into())
            }
            (Some(_), Some(_), Some(_)) => {
                Err("case clause cannot combine 'default' with a condition".into())
            }
            (None, None, None) => {
                Err("case clause requires 'when', 'and', 'or' or 'default'".into())
            }
        }
    }
}

impl From<CaseClause> for CaseClauseRepr {
    fn from(clause: CaseClause) -> Self {
        let mut repr = CaseClauseRepr {
            when: None,
            and: None,
            or: None,
            then: None,
            default: None,
        };
        match clause {
            CaseClause::When { condition, then } => {
                match condition {
                    Predicate::Leaf(c) => repr.when = Some(c),
                    Predicate::And(children) => repr.and = Some(children),
                    Predicate::Or(children) => repr.or = Some(children),
                }
                repr.then = Some(then);
            }
            CaseClause::Default(then) => repr.default = Some(then),
        }
        repr
    }
}

/// Result of a case branch: a literal or a column reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThenValueRepr", into = "ThenValueRepr")]
pub enum ThenValue {
    Value(Value),
    Column(String),
}

impl ThenValue {
    pub fn value(value: impl Into<Value>) -> Self {
        ThenValue::Value(value.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        ThenValue::Column(name.into())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThenValueRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<String>,
}

impl TryFrom<ThenValueRepr> for ThenValue {
    type Error = String;

    fn try_from(repr: ThenValueRepr) -> Result<Self, Self::Error> {
        match (repr.value, repr.column) {
            (Some(value), None) => Ok(ThenValue::Value(value)),
            (None, Some(column)) => Ok(ThenValue::Column(column)),
            (Some(_), Some(_)) => Err("then value sets both 'value' and 'column'".into()),
            (None, None) => Err("then value requires a non-null 'value' or a 'column'".into()),
        }
    }
}

impl From<ThenValue> for ThenValueRepr {
    fn from(then: ThenValue) -> Self {
        match then {
            ThenValue::Value(value) => ThenValueRepr {
                value: Some(value),
                column: None,
            },
            ThenValue::Column(column) => ThenValueRepr {
                value: None,
                column: Some(column),
            },
        }
    }
}

/// Interval and row filters of a composition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameters {
    #[serde(default)]
    pub interval: Option<Interval>,
    #[serde(default)]
    pub row_filters: Vec<RowFilter>,
}

/// Request-time overrides of a composition's parameters.
///
/// `interval` distinguishes a missing key (`None`, use the default) from an
/// explicit `null` (`Some(None)`, no date filter).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOverrides {
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Option<Interval>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_filters: Option<Vec<RowFilter>>,
}

impl ParameterOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = Some(Some(interval));
        self
    }

    /// Disable the date filter regardless of the default interval.
    pub fn without_interval(mut self) -> Self {
        self.interval = Some(None);
        self
    }

    pub fn with_row_filters(mut self, filters: Vec<RowFilter>) -> Self {
        self.row_filters = Some(filters);
        self
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
