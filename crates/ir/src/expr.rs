// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module represents SQL expressions in the statement tree.
//!
//! ## Design
//!
//! Expressions form a tree where complex expressions contain sub-expressions.
//! The leaves that the binder resolves are:
//!
//! - **Column references** ([`ColumnSegment`]): `column` or `owner.column`
//! - **Parameter markers** ([`ParameterMarker`]): `?`, `$1`, `:name`
//!
//! Every other node (literals, operators, functions, CASE, CAST, subqueries)
//! is rebuilt structurally with its leaves replaced by their bound forms.
//!
//! ```text
//! BinaryOp {
//!   left: Column(o.user_id),
//!   op: Eq,
//!   right: ParameterMarker(?, index 0)
//! }
//! ```
//!
//! Represents: `o.user_id = ?`

use serde::{Deserialize, Serialize};

use crate::bound::ColumnBoundInfo;
use crate::span::Span;
use crate::statement::SelectStatement;

/// A SQL expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference (e.g., `table.column` or just `column`)
    Column(ColumnSegment),

    /// Literal value
    Literal { span: Span, value: Literal },

    /// Prepared-statement placeholder
    ParameterMarker(ParameterMarker),

    /// Binary operation (e.g., `a + b`, `x = 5`)
    BinaryOp {
        span: Span,
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation (e.g., `-x`, `NOT a`)
    UnaryOp {
        span: Span,
        op: UnaryOp,
        expr: Box<Expr>,
    },

    /// Function call (e.g., `COUNT(*)`, `MAX(column)`)
    Function {
        span: Span,
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// CASE expression, with an optional operand for the simple form
    Case {
        span: Span,
        operand: Option<Box<Expr>>,
        conditions: Vec<Expr>,
        results: Vec<Expr>,
        else_result: Option<Box<Expr>>,
    },

    /// CAST expression
    Cast {
        span: Span,
        expr: Box<Expr>,
        type_name: String,
    },

    /// `expr [NOT] BETWEEN low AND high`
    Between {
        span: Span,
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// `expr [NOT] IN (a, b, c)`
    InList {
        span: Span,
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        span: Span,
        expr: Box<Expr>,
        subquery: SubquerySegment,
        negated: bool,
    },

    /// `[NOT] EXISTS (SELECT ...)`
    Exists {
        span: Span,
        subquery: SubquerySegment,
        negated: bool,
    },

    /// Scalar subquery
    Subquery(SubquerySegment),

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Row constructor / value list (e.g., `(a, b)`)
    List(Vec<Expr>),
}

impl Expr {
    /// Source span of this expression
    pub fn span(&self) -> Span {
        match self {
            Expr::Column(column) => column.span,
            Expr::ParameterMarker(marker) => marker.span,
            Expr::Subquery(subquery) => subquery.span,
            Expr::Literal { span, .. }
            | Expr::BinaryOp { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::Function { span, .. }
            | Expr::Case { span, .. }
            | Expr::Cast { span, .. }
            | Expr::Between { span, .. }
            | Expr::InList { span, .. }
            | Expr::InSubquery { span, .. }
            | Expr::Exists { span, .. } => *span,
            Expr::Paren(inner) => inner.span(),
            Expr::List(items) => items
                .iter()
                .map(Expr::span)
                .reduce(Span::cover)
                .unwrap_or_default(),
        }
    }

    /// Shorthand for an unbound column reference
    pub fn column(column: ColumnSegment) -> Self {
        Expr::Column(column)
    }

    /// Shorthand for a literal
    pub fn literal(span: Span, value: Literal) -> Self {
        Expr::Literal { span, value }
    }

    /// Shorthand for a binary operation spanning both operands
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinaryOp {
            span: left.span().cover(right.span()),
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Visit every column reference in this expression.
    ///
    /// Subqueries are not entered; their columns belong to another statement.
    pub fn visit_columns<'a>(&'a self, visitor: &mut impl FnMut(&'a ColumnSegment)) {
        match self {
            Expr::Column(column) => visitor(column),
            Expr::Literal { .. }
            | Expr::ParameterMarker(_)
            | Expr::Exists { .. }
            | Expr::Subquery(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.visit_columns(visitor);
                right.visit_columns(visitor);
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::InSubquery { expr, .. } => {
                expr.visit_columns(visitor)
            }
            Expr::Paren(expr) => expr.visit_columns(visitor),
            Expr::Function { args, .. } | Expr::List(args) => {
                args.iter().for_each(|arg| arg.visit_columns(visitor))
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
                ..
            } => {
                if let Some(operand) = operand {
                    operand.visit_columns(visitor);
                }
                conditions.iter().for_each(|c| c.visit_columns(visitor));
                results.iter().for_each(|r| r.visit_columns(visitor));
                if let Some(else_result) = else_result {
                    else_result.visit_columns(visitor);
                }
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.visit_columns(visitor);
                low.visit_columns(visitor);
                high.visit_columns(visitor);
            }
            Expr::InList { expr, list, .. } => {
                expr.visit_columns(visitor);
                list.iter().for_each(|item| item.visit_columns(visitor));
            }
        }
    }
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSegment {
    pub span: Span,
    /// Optional table/alias qualifier
    pub owner: Option<String>,
    /// Column name as written
    pub name: String,
    /// Filled in by the binder
    pub bound: Option<ColumnBoundInfo>,
}

impl ColumnSegment {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            owner: None,
            name: name.into(),
            bound: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_bound(mut self, bound: ColumnBoundInfo) -> Self {
        self.bound = Some(bound);
        self
    }

    pub fn qualified(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }
}

impl From<ColumnSegment> for Expr {
    fn from(column: ColumnSegment) -> Self {
        Expr::Column(column)
    }
}

impl From<ParameterMarker> for Expr {
    fn from(marker: ParameterMarker) -> Self {
        Expr::ParameterMarker(marker)
    }
}

/// Placeholder syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterMarkerKind {
    /// `?`
    Question,
    /// `$1`
    Dollar,
    /// `:name` / `@name`
    Named(String),
}

/// A prepared-statement placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterMarker {
    pub span: Span,
    /// Zero-based parameter index
    pub index: usize,
    pub kind: ParameterMarkerKind,
    /// Bound info of the column slot this marker fills, if one can be inferred
    pub bound: Option<ColumnBoundInfo>,
}

impl ParameterMarker {
    pub fn new(span: Span, index: usize) -> Self {
        Self {
            span,
            index,
            kind: ParameterMarkerKind::Question,
            bound: None,
        }
    }

    pub fn with_kind(mut self, kind: ParameterMarkerKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A subquery used as an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubquerySegment {
    pub span: Span,
    pub select: Box<SelectStatement>,
}

impl SubquerySegment {
    pub fn new(span: Span, select: SelectStatement) -> Self {
        Self {
            span,
            select: Box::new(select),
        }
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Like,
    NotLike,
    Concat,

    // Other
    Is,
    IsNot,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum UnaryOp {
    Neg,
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_segment() {
        let col = ColumnSegment::new(Span::new(7, 8), "id");
        assert_eq!(col.qualified(), "id");
        assert!(col.owner.is_none());
        assert!(!col.is_bound());

        let qualified = col.with_owner("o");
        assert_eq!(qualified.qualified(), "o.id");
    }

    #[test]
    fn test_binary_span_covers_operands() {
        let expr = Expr::binary(
            Expr::column(ColumnSegment::new(Span::new(30, 38), "order_id")),
            BinaryOp::Eq,
            Expr::ParameterMarker(ParameterMarker::new(Span::new(42, 42), 0)),
        );
        assert_eq!(expr.span(), Span::new(30, 42));
    }
}
