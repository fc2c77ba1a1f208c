//! Predicate compiler: boolean trees to SQL boolean expressions.
//!
//! `and`/`or` groups are always parenthesized; leaves never are. Nested
//! groups carry their own parentheses, so the output is unambiguous without
//! relying on operator precedence.

use super::operators::compile_condition;
use super::{CompileError, CompileResult};
use crate::model::{Condition, FilterExpr, Predicate, RowFilter};
use crate::sql::{Token, TokenStream};

/// Borrowed view of one node of a boolean tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a, T> {
    Leaf(&'a Condition),
    And(&'a [T]),
    Or(&'a [T]),
}

/// A type shaped like a boolean expression tree.
pub trait BooleanNode: Sized {
    fn node(&self) -> Node<'_, Self>;
}

impl BooleanNode for Predicate {
    fn node(&self) -> Node<'_, Self> {
        match self {
            Predicate::Leaf(c) => Node::Leaf(c),
            Predicate::And(children) => Node::And(children),
            Predicate::Or(children) => Node::Or(children),
        }
    }
}

impl BooleanNode for FilterExpr {
    fn node(&self) -> Node<'_, Self> {
        match self {
            FilterExpr::Leaf(c) => Node::Leaf(c),
            FilterExpr::And { and } => Node::And(and),
            FilterExpr::Or { or } => Node::Or(or),
        }
    }
}

/// Compile a boolean tree, rejecting nesting deeper than `max_depth`.
pub fn compile_predicate<T: BooleanNode>(node: &T, max_depth: usize) -> CompileResult<TokenStream> {
    compile_at(node, 1, max_depth)
}

/// Compile the expression of a top-level row filter.
pub fn compile_row_filter(filter: &RowFilter, max_depth: usize) -> CompileResult<TokenStream> {
    compile_predicate(&filter.expr, max_depth)
}

fn compile_at<T: BooleanNode>(node: &T, depth: usize, max_depth: usize) -> CompileResult<TokenStream> {
    if depth > max_depth {
        return Err(CompileError::NestingTooDeep { limit: max_depth });
    }

    match node.node() {
        Node::Leaf(condition) => compile_condition(condition),
        Node::And(children) => compile_group(children, Token::And, depth, max_depth),
        Node::Or(children) => compile_group(children, Token::Or, depth, max_depth),
    }
}

fn compile_group<T: BooleanNode>(
    children: &[T],
    conjunction: Token,
    depth: usize,
    max_depth: usize,
) -> CompileResult<TokenStream> {
    let mut ts = TokenStream::new();
    ts.lparen();
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            ts.space().push(conjunction.clone()).space();
        }
        ts.append(&compile_at(child, depth + 1, max_depth)?);
    }
    ts.rparen();
    Ok(ts)
}
