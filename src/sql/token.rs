//! SQL Tokens - the atomic units of SQL output.
//!
//! Every compiler in this crate emits a [`TokenStream`]. The stream can be
//! serialized to text for a dialect, or bound, in which case caller supplied
//! string literals are pulled out into positional parameters.

use serde::Serialize;

use super::dialect::{Dialect, SqlDialect};

/// SQL Token - every element a composed statement can contain.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Statement Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    As,
    Case,
    When,
    Then,
    Else,
    End,
    Null,

    // === Fragment Keywords ===
    // Predicates and date filters render these in lowercase.
    IsNull,
    IsNotNull,
    Like,
    ILike,
    LowerAnd,
    CurrentTimestamp,
    Interval,

    // === Punctuation ===
    Comma,
    Dot,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Minus,

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Alias name, quoted by the dialect when needed.
    Ident(String),
    /// Column reference authored in a composition. Emitted as written, so
    /// expressions and pre-quoted names keep their meaning.
    ColumnRef(String),
    /// `schema.table`.
    QualifiedIdent { schema: String, name: String },
    /// Numeric literal, always rendered inline.
    LitNumber(serde_json::Number),
    /// Caller supplied string literal. Becomes a placeholder when bound.
    LitString(String),
    /// Engine generated string literal (interval text, calendar dates).
    /// Quoted like any string but never bound.
    LitInline(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// Only column `sql` fragments authored in a composition use this.
    Raw(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: Dialect) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::As => "AS".into(),
            Token::Case => "CASE".into(),
            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),
            Token::End => "END".into(),
            Token::Null => dialect.format_null().into(),

            Token::IsNull => "is null".into(),
            Token::IsNotNull => "is not null".into(),
            Token::Like => "like".into(),
            Token::ILike => "ilike".into(),
            Token::LowerAnd => "and".into(),
            Token::CurrentTimestamp => "current_timestamp".into(),
            Token::Interval => "interval".into(),

            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),
            Token::Ne => "<>".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Minus => "-".into(),

            Token::Space => " ".into(),

            Token::Ident(name) => dialect.quote_identifier(name),
            Token::ColumnRef(column) => column.clone(),
            Token::QualifiedIdent { schema, name } => format!(
                "{}.{}",
                dialect.quote_identifier(schema),
                dialect.quote_identifier(name)
            ),
            Token::LitNumber(n) => format_number(n),
            Token::LitString(s) | Token::LitInline(s) => dialect.quote_string(s),

            Token::Raw(s) => s.clone(),
        }
    }
}

/// Render a JSON number the way a JavaScript-authored composition expects:
/// integral values without a fractional part, everything else shortest
/// round-trip.
pub fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => integral_text(f),
        Some(f) if f.is_finite() => {
            let mut buffer = ryu::Buffer::new();
            buffer.format_finite(f).to_string()
        }
        _ => n.to_string(),
    }
}

/// Integral float as plain digits: shortest round-trip digits padded with
/// zeros, never an exponent.
fn integral_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format_finite(f);
    let (mantissa, exponent) = match text.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let fraction = fraction.trim_end_matches('0');
    let zeros = exponent - fraction.len() as i32;
    if zeros < 0 {
        return format!("{:.0}", f);
    }
    format!(
        "{}{}{}{}",
        sign,
        whole,
        fraction,
        "0".repeat(zeros as usize)
    )
}

/// SQL text plus the positional parameters its placeholders refer to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoundSql {
    pub sql: String,
    pub params: Vec<String>,
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: Dialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    /// Serialize with every [`Token::LitString`] replaced by a placeholder.
    pub fn bind(&self, dialect: Dialect) -> BoundSql {
        let mut bound = BoundSql::default();
        for token in &self.tokens {
            match token {
                Token::LitString(value) => {
                    bound.params.push(value.clone());
                    bound.sql.push_str(&dialect.placeholder(bound.params.len()));
                }
                other => bound.sql.push_str(&other.serialize(dialect)),
            }
        }
        bound
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}
