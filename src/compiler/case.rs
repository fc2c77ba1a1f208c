//! Case expression compiler.

use super::operators::literal;
use super::predicate::compile_predicate;
use super::CompileResult;
use crate::model::{CaseClause, ThenValue};
use crate::sql::{Token, TokenStream};

/// Compile a `cases` list to `CASE WHEN ... THEN ... ELSE ... END`.
///
/// `Default` clauses emit no branch; the last one supplies the `ELSE` value.
/// Without one the result is `ELSE NULL`. A list of only defaults yields
/// `CASE ELSE <x> END`.
pub fn compile_cases(clauses: &[CaseClause], max_depth: usize) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.push(Token::Case);

    let mut default: Option<&ThenValue> = None;
    for clause in clauses {
        match clause {
            CaseClause::Default(then) => default = Some(then),
            CaseClause::When { condition, then } => {
                ts.space()
                    .push(Token::When)
                    .space()
                    .append(&compile_predicate(condition, max_depth)?)
                    .space()
                    .push(Token::Then)
                    .space()
                    .push(then_token(then));
            }
        }
    }

    ts.space().push(Token::Else).space();
    ts.push(default.map(then_token).unwrap_or(Token::Null));
    ts.space().push(Token::End);
    Ok(ts)
}

fn then_token(then: &ThenValue) -> Token {
    match then {
        ThenValue::Column(column) => Token::ColumnRef(column.clone()),
        ThenValue::Value(value) => literal(value),
    }
}
