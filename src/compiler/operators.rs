//! Operator registry: operator names to SQL fragments.

use std::str::FromStr;

use super::{CompileError, CompileResult};
use crate::model::{Condition, Value};
use crate::sql::token::format_number;
use crate::sql::{Token, TokenStream};

/// Comparison operators a condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    IsNull,
    IsNotNull,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    StartsWith,
    EndsWith,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::IsNull,
        Operator::IsNotNull,
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
    ];

    /// Name as written in compositions.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::IsNull => "is_null",
            Operator::IsNotNull => "is_not_null",
            Operator::Equal => "equal",
            Operator::NotEqual => "not_equal",
            Operator::LessThan => "less_than",
            Operator::LessThanOrEqual => "less_than_or_equal",
            Operator::GreaterThan => "greater_than",
            Operator::GreaterThanOrEqual => "greater_than_or_equal",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether the operator compares against a value.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::IsNull | Operator::IsNotNull)
    }

    /// Whether the operator renders a `like`/`ilike` pattern.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    fn comparison_token(&self) -> Option<Token> {
        match self {
            Operator::Equal => Some(Token::Eq),
            Operator::NotEqual => Some(Token::Ne),
            Operator::LessThan => Some(Token::Lt),
            Operator::LessThanOrEqual => Some(Token::Lte),
            Operator::GreaterThan => Some(Token::Gt),
            Operator::GreaterThanOrEqual => Some(Token::Gte),
            _ => None,
        }
    }

    fn pattern(&self, text: &str) -> String {
        match self {
            Operator::StartsWith => format!("{}%", text),
            Operator::EndsWith => format!("%{}", text),
            _ => format!("%{}%", text),
        }
    }

    /// Render `column <op> value`.
    pub fn to_tokens(
        &self,
        column: &str,
        value: &Value,
        case_sensitive: bool,
    ) -> CompileResult<TokenStream> {
        let mut ts = TokenStream::new();
        ts.push(Token::ColumnRef(column.to_string())).space();

        if !self.takes_value() {
            ts.push(match self {
                Operator::IsNull => Token::IsNull,
                _ => Token::IsNotNull,
            });
            return Ok(ts);
        }

        if value.is_null() {
            return Err(CompileError::MissingValue(self.name().to_string()));
        }

        if let Some(op) = self.comparison_token() {
            ts.push(op).space().push(literal(value));
        } else {
            let text = match value {
                Value::Number(n) => format_number(n),
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
            };
            ts.push(if case_sensitive { Token::Like } else { Token::ILike })
                .space()
                .push(Token::LitString(self.pattern(&text)));
        }
        Ok(ts)
    }
}

impl FromStr for Operator {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::from_name(s).ok_or_else(|| CompileError::UnknownOperator(s.to_string()))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Numbers render inline, strings quoted, null as `NULL`.
pub fn literal(value: &Value) -> Token {
    match value {
        Value::Number(n) => Token::LitNumber(n.clone()),
        Value::String(s) => Token::LitString(s.clone()),
        Value::Null => Token::Null,
    }
}

/// Compile a single condition through the registry.
pub fn compile_condition(condition: &Condition) -> CompileResult<TokenStream> {
    let operator: Operator = condition.operator.parse()?;
    operator.to_tokens(
        &condition.column,
        &condition.value,
        condition.is_case_sensitive(),
    )
}
