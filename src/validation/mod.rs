//! Structural validation of query documents and parameter overrides.
//!
//! Serde enforces the shape of a document; the checks here cover what the
//! types cannot express (lengths, non-empty strings, known operators,
//! nesting depth). Every problem found is reported, each with the location
//! of the offending value, e.g. `composition.columns.platform.cases[1].and`.

use crate::compiler::{BooleanNode, Node, Operator};
use crate::model::{
    CaseClause, ColumnExpression, Composition, Condition, ParameterOverrides, RowFilter,
    SqlQueryDocument, ThenValue, Value, ROW_FILTER_TEMPLATE,
};

pub use crate::compiler::DEFAULT_MAX_DEPTH;

/// Most output columns a composition may declare.
pub const MAX_COLUMNS: usize = 128;

/// Most top-level row filters a parameter set may carry.
pub const MAX_ROW_FILTERS: usize = 16;

/// Fewest children an `and`/`or` group may have.
pub const MIN_GROUP_CHILDREN: usize = 2;

/// Fewest clauses a `cases` list may have.
pub const MIN_CASE_CLAUSES: usize = 2;

/// Validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The document is not valid JSON or does not have the expected shape.
    Malformed(String),
    /// Both or neither of `query` and `composition` are present.
    AmbiguousSource,
    Empty {
        location: String,
    },
    TooFew {
        location: String,
        min: usize,
        found: usize,
    },
    TooMany {
        location: String,
        max: usize,
        found: usize,
    },
    UnknownOperator {
        location: String,
        operator: String,
    },
    MissingValue {
        location: String,
        operator: String,
    },
    NullValue {
        location: String,
    },
    WrongTemplateType {
        location: String,
        expected: String,
        found: String,
    },
    TooDeep {
        location: String,
        limit: usize,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Malformed(message) => write!(f, "Malformed document: {}", message),
            ValidationError::AmbiguousSource => write!(
                f,
                "Document must contain exactly one of 'query' or 'composition'"
            ),
            ValidationError::Empty { location } => write!(f, "{} must not be empty", location),
            ValidationError::TooFew {
                location,
                min,
                found,
            } => write!(
                f,
                "{} needs at least {} entries, found {}",
                location, min, found
            ),
            ValidationError::TooMany {
                location,
                max,
                found,
            } => write!(
                f,
                "{} allows at most {} entries, found {}",
                location, max, found
            ),
            ValidationError::UnknownOperator { location, operator } => {
                write!(f, "{} uses unknown operator '{}'", location, operator)
            }
            ValidationError::MissingValue { location, operator } => {
                write!(f, "{} operator '{}' requires a value", location, operator)
            }
            ValidationError::NullValue { location } => {
                write!(f, "{} must not be null", location)
            }
            ValidationError::WrongTemplateType {
                location,
                expected,
                found,
            } => write!(
                f,
                "{} has template type '{}', expected '{}'",
                location, found, expected
            ),
            ValidationError::TooDeep { location, limit } => {
                write!(f, "{} nests deeper than {} levels", location, limit)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Join errors into a single `; `-separated message.
pub fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a stored query document.
pub fn validate_document(
    document: &SqlQueryDocument,
    max_depth: usize,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (&document.query, &document.composition) {
        (Some(query), None) => {
            if query.trim().is_empty() {
                errors.push(ValidationError::Empty {
                    location: "query".into(),
                });
            }
        }
        (None, Some(composition)) => {
            check_composition(composition, "composition", max_depth, &mut errors)
        }
        _ => errors.push(ValidationError::AmbiguousSource),
    }

    if let Some(description) = &document.description {
        if description.is_empty() {
            errors.push(ValidationError::Empty {
                location: "description".into(),
            });
        }
    }

    finish(errors)
}

/// Validate a composition on its own.
pub fn validate_composition(
    composition: &Composition,
    max_depth: usize,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_composition(composition, "composition", max_depth, &mut errors);
    finish(errors)
}

/// Validate request-time overrides.
pub fn validate_overrides(
    overrides: &ParameterOverrides,
    max_depth: usize,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if let Some(filters) = &overrides.row_filters {
        check_row_filters(filters, "parameters.rowFilters", max_depth, &mut errors);
    }
    finish(errors)
}

fn check_composition(
    composition: &Composition,
    location: &str,
    max_depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    if composition.table.trim().is_empty() {
        errors.push(ValidationError::Empty {
            location: format!("{}.table", location),
        });
    }

    let columns_location = format!("{}.columns", location);
    let count = composition.columns.len();
    if count == 0 {
        errors.push(ValidationError::TooFew {
            location: columns_location.clone(),
            min: 1,
            found: 0,
        });
    } else if count > MAX_COLUMNS {
        errors.push(ValidationError::TooMany {
            location: columns_location.clone(),
            max: MAX_COLUMNS,
            found: count,
        });
    }

    for (name, column) in &composition.columns {
        if name.is_empty() {
            errors.push(ValidationError::Empty {
                location: format!("{} name", columns_location),
            });
        }
        let column_location = format!("{}.{}", columns_location, name);
        match column {
            ColumnExpression::Raw { sql } => {
                if sql.trim().is_empty() {
                    errors.push(ValidationError::Empty {
                        location: format!("{}.sql", column_location),
                    });
                }
            }
            ColumnExpression::Cased { cases } => {
                check_cases(cases, &format!("{}.cases", column_location), max_depth, errors)
            }
        }
    }

    check_row_filters(
        &composition.parameters.row_filters,
        &format!("{}.parameters.rowFilters", location),
        max_depth,
        errors,
    );
}

fn check_cases(
    cases: &[CaseClause],
    location: &str,
    max_depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    if cases.len() < MIN_CASE_CLAUSES {
        errors.push(ValidationError::TooFew {
            location: location.to_string(),
            min: MIN_CASE_CLAUSES,
            found: cases.len(),
        });
    }

    for (i, clause) in cases.iter().enumerate() {
        let clause_location = format!("{}[{}]", location, i);
        match clause {
            CaseClause::When { condition, then } => {
                check_tree(condition, &clause_location, 1, max_depth, errors);
                check_then(then, &format!("{}.then", clause_location), errors);
            }
            CaseClause::Default(then) => {
                check_then(then, &format!("{}.default", clause_location), errors)
            }
        }
    }
}

fn check_then(then: &ThenValue, location: &str, errors: &mut Vec<ValidationError>) {
    match then {
        ThenValue::Column(column) if column.is_empty() => errors.push(ValidationError::Empty {
            location: format!("{}.column", location),
        }),
        ThenValue::Value(Value::Null) => errors.push(ValidationError::NullValue {
            location: format!("{}.value", location),
        }),
        _ => {}
    }
}

fn check_row_filters(
    filters: &[RowFilter],
    location: &str,
    max_depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    if filters.len() > MAX_ROW_FILTERS {
        errors.push(ValidationError::TooMany {
            location: location.to_string(),
            max: MAX_ROW_FILTERS,
            found: filters.len(),
        });
    }

    for (i, filter) in filters.iter().enumerate() {
        let filter_location = format!("{}[{}]", location, i);
        let metadata = &filter.metadata;
        if metadata.template_type != ROW_FILTER_TEMPLATE {
            errors.push(ValidationError::WrongTemplateType {
                location: format!("{}.metadata", filter_location),
                expected: ROW_FILTER_TEMPLATE.to_string(),
                found: metadata.template_type.clone(),
            });
        }
        if metadata.identifier.is_empty() {
            errors.push(ValidationError::Empty {
                location: format!("{}.metadata.identifier", filter_location),
            });
        }
        check_tree(&filter.expr, &filter_location, 1, max_depth, errors);
    }
}

fn check_tree<T: BooleanNode>(
    node: &T,
    location: &str,
    depth: usize,
    max_depth: usize,
    errors: &mut Vec<ValidationError>,
) {
    if depth > max_depth {
        errors.push(ValidationError::TooDeep {
            location: location.to_string(),
            limit: max_depth,
        });
        return;
    }

    let (children, group_location) = match node.node() {
        Node::Leaf(condition) => return check_condition(condition, location, errors),
        Node::And(children) => (children, format!("{}.and", location)),
        Node::Or(children) => (children, format!("{}.or", location)),
    };

    if children.len() < MIN_GROUP_CHILDREN {
        errors.push(ValidationError::TooFew {
            location: group_location.clone(),
            min: MIN_GROUP_CHILDREN,
            found: children.len(),
        });
    }
    for (i, child) in children.iter().enumerate() {
        check_tree(
            child,
            &format!("{}[{}]", group_location, i),
            depth + 1,
            max_depth,
            errors,
        );
    }
}

fn check_condition(condition: &Condition, location: &str, errors: &mut Vec<ValidationError>) {
    if condition.column.trim().is_empty() {
        errors.push(ValidationError::Empty {
            location: format!("{}.column", location),
        });
    }

    match Operator::from_name(&condition.operator) {
        None => errors.push(ValidationError::UnknownOperator {
            location: format!("{}.operator", location),
            operator: condition.operator.clone(),
        }),
        Some(op) if op.takes_value() && condition.value.is_null() => {
            errors.push(ValidationError::MissingValue {
                location: format!("{}.value", location),
                operator: op.name().to_string(),
            })
        }
        Some(_) => {}
    }
}
