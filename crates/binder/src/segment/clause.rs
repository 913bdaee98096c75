// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Lenient clauses
//!
//! GROUP BY, HAVING, ORDER BY, WINDOW and LIMIT are bound with a lenient
//! [`ExpressionBinder`]: names may refer to SELECT-list aliases, and columns
//! that resolve to nothing are passed through unbound unless
//! `strict_clause_binding` is set. Parameter markers are collected either way.
//!
//! ORDER BY tries aliases before table columns. GROUP BY, HAVING and WINDOW
//! try table columns first and aliases only as a fallback.
//!
//! DELETE and UPDATE carry their ORDER BY and LIMIT through unresolved.

use sql_binder_ir::{
    GroupBySegment, HavingSegment, LimitSegment, OrderByItem, OrderBySegment, WindowItem,
    WindowSegment,
};

use crate::error::BindResult;
use crate::segment::expression::ExpressionBinder;
use crate::segment::parameter_marker::ParameterMarkerCollector;

pub fn bind_group_by(
    segment: &GroupBySegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<GroupBySegment> {
    Ok(GroupBySegment {
        span: segment.span,
        items: bind_items(&segment.items, expressions, markers)?,
    })
}

pub fn bind_having(
    segment: &HavingSegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<HavingSegment> {
    Ok(HavingSegment {
        span: segment.span,
        expr: expressions.bind(&segment.expr, markers)?,
    })
}

pub fn bind_order_by(
    segment: &OrderBySegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<OrderBySegment> {
    Ok(OrderBySegment {
        span: segment.span,
        items: bind_items(&segment.items, expressions, markers)?,
    })
}

pub fn bind_window(
    segment: &WindowSegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<WindowSegment> {
    let items = segment
        .items
        .iter()
        .map(|item| {
            Ok(WindowItem {
                name: item.name.clone(),
                partition_by: item
                    .partition_by
                    .iter()
                    .map(|expr| expressions.bind(expr, markers))
                    .collect::<BindResult<_>>()?,
                order_by: bind_items(&item.order_by, expressions, markers)?,
            })
        })
        .collect::<BindResult<_>>()?;
    Ok(WindowSegment {
        span: segment.span,
        items,
    })
}

/// LIMIT rarely names a column; it is bound for its parameter markers
pub fn bind_limit(
    segment: &LimitSegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<LimitSegment> {
    Ok(LimitSegment {
        span: segment.span,
        row_count: segment
            .row_count
            .as_ref()
            .map(|expr| expressions.bind(expr, markers))
            .transpose()?,
        offset: segment
            .offset
            .as_ref()
            .map(|expr| expressions.bind(expr, markers))
            .transpose()?,
    })
}

/// Copy an ORDER BY that is not resolved, keeping its markers
pub fn carry_order_by(segment: &OrderBySegment, markers: &mut ParameterMarkerCollector) -> OrderBySegment {
    for item in &segment.items {
        markers.collect_unbound(&item.expr);
    }
    segment.clone()
}

/// Copy a LIMIT that is not resolved, keeping its markers
pub fn carry_limit(segment: &LimitSegment, markers: &mut ParameterMarkerCollector) -> LimitSegment {
    for expr in segment.row_count.iter().chain(&segment.offset) {
        markers.collect_unbound(expr);
    }
    segment.clone()
}

fn bind_items(
    items: &[OrderByItem],
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<Vec<OrderByItem>> {
    items
        .iter()
        .map(|item| {
            Ok(OrderByItem {
                expr: expressions.bind(&item.expr, markers)?,
                direction: item.direction,
            })
        })
        .collect()
}
