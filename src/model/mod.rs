//! Query documents and the expression language they contain.

pub mod composition;
pub mod interval;
pub mod predicate;
pub mod query;

pub use composition::{
    CaseClause, ColumnExpression, Composition, CompositionMetadata, ParameterOverrides,
    QueryParameters, QueryType, ThenValue,
};
pub use interval::{DateRange, Interval};
pub use predicate::{
    Condition, ConditionOptions, FilterExpr, FilterMetadata, Predicate, RowFilter, Value,
    ROW_FILTER_TEMPLATE,
};
pub use query::{QuerySource, SqlQuery, SqlQueryDocument};
