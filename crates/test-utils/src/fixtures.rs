// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builders for unbound statement trees
//!
//! Tests describe statements by hand instead of parsing SQL. Spans only have
//! to be distinct and ordered the way the text would order them, so most
//! helpers take a start offset and derive the end from the name's length.

use sql_binder_ir::{
    BinaryOp, ColumnSegment, Dialect, Expr, ParameterMarker, Projection, ProjectionsSegment,
    SelectStatement, SimpleTableSegment, Span, SubquerySegment, WhereSegment,
};

/// Span starting at `start` and covering `len` characters
pub fn span(start: usize, len: usize) -> Span {
    Span::new(start, start + len.saturating_sub(1))
}

/// Unqualified column reference `name` at `start`
pub fn col(start: usize, name: &str) -> ColumnSegment {
    ColumnSegment::new(span(start, name.len()), name)
}

/// Qualified column reference `owner.name` at `start`
pub fn owned_col(start: usize, owner: &str, name: &str) -> ColumnSegment {
    ColumnSegment::new(span(start, owner.len() + name.len() + 1), name).with_owner(owner)
}

/// `?` at `start` with parameter index `index`
pub fn marker(start: usize, index: usize) -> Expr {
    Expr::ParameterMarker(ParameterMarker::new(Span::new(start, start), index))
}

/// `left = right`
pub fn eq(left: impl Into<Expr>, right: impl Into<Expr>) -> Expr {
    Expr::binary(left.into(), BinaryOp::Eq, right.into())
}

/// `table [AS alias]` at `start`
pub fn table(start: usize, name: &str, alias: Option<&str>) -> SimpleTableSegment {
    let segment = SimpleTableSegment::new(span(start, name.len()), name);
    match alias {
        Some(alias) => segment.with_alias(alias),
        None => segment,
    }
}

/// SELECT list covering the spans of its projections
pub fn projections(projections: Vec<Projection>) -> ProjectionsSegment {
    let span = projections
        .iter()
        .map(Projection::span)
        .reduce(Span::cover)
        .unwrap_or_default();
    ProjectionsSegment::new(span, projections)
}

/// `SELECT projections FROM from`
pub fn select(projections: Vec<Projection>, from: SimpleTableSegment) -> SelectStatement {
    SelectStatement::new(Dialect::MySQL)
        .with_projections(self::projections(projections))
        .with_from(from)
}

/// `WHERE expr`, spanning the expression
pub fn where_clause(expr: Expr) -> WhereSegment {
    WhereSegment::new(expr.span(), expr)
}

/// `(select)` spanning `start..=end`
pub fn subquery(start: usize, end: usize, select: SelectStatement) -> SubquerySegment {
    SubquerySegment::new(Span::new(start, end), select)
}
