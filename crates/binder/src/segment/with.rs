// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # WITH binding
//!
//! Each common table expression is bound in declaration order and then made
//! visible through the context's external scopes, so later CTEs and the
//! statement body can select from it by name.
//!
//! For `WITH RECURSIVE`, a CTE whose body is a set operation is bound in two
//! passes: the anchor (left side) alone first, to learn the CTE's columns,
//! then the whole body with those columns in scope.

use sql_binder_ir::{ColumnSource, CommonTableExpr, SelectStatement, SubquerySegment, WithSegment};
use tracing::debug;

use crate::context::BinderContext;
use crate::error::{BindError, BindResult};
use crate::scope::{OuterScopes, TableScope, TableScopeSource};
use crate::segment::parameter_marker::ParameterMarkerCollector;
use crate::segment::projection::output_columns;
use crate::statement::select::SelectStatementBinder;

/// Bind every CTE of `segment`, registering each one in `context`
pub fn bind_with(
    segment: &WithSegment,
    context: &mut BinderContext<'_>,
    outer: &OuterScopes<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<WithSegment> {
    let mut ctes = Vec::with_capacity(segment.ctes.len());
    for cte in &segment.ctes {
        let select = if segment.recursive && cte.subquery.select.combine.is_some() {
            bind_recursive(cte, context, outer)?
        } else {
            SelectStatementBinder::correlated(context, outer).bind(&cte.subquery.select)?
        };
        markers.extend(&select.attributes.parameter_markers);

        let scope = cte_scope(cte, &select, context.database())?;
        debug!(cte = %cte.name, columns = scope.columns.len(), "Bound common table expression");
        context.add_external_scope(scope);

        ctes.push(CommonTableExpr {
            span: cte.span,
            name: cte.name.clone(),
            columns: cte.columns.clone(),
            subquery: SubquerySegment {
                span: cte.subquery.span,
                select: Box::new(select),
            },
        });
    }
    Ok(WithSegment {
        span: segment.span,
        recursive: segment.recursive,
        ctes,
    })
}

/// Copy a WITH clause that is not resolved, keeping the recorded markers of
/// its CTE bodies
pub fn carry_with(segment: &WithSegment, markers: &mut ParameterMarkerCollector) -> WithSegment {
    for cte in &segment.ctes {
        markers.extend(&cte.subquery.select.attributes.parameter_markers);
    }
    debug!(segment = "WITH", "Passing segment through unbound");
    segment.clone()
}

fn bind_recursive(
    cte: &CommonTableExpr,
    context: &BinderContext<'_>,
    outer: &OuterScopes<'_>,
) -> BindResult<SelectStatement> {
    let body = &cte.subquery.select;
    let Some(combine) = &body.combine else {
        return SelectStatementBinder::correlated(context, outer).bind(body);
    };

    let anchor = SelectStatementBinder::correlated(context, outer).bind(&combine.left.select)?;
    let mut recursive_context = context.clone();
    recursive_context.add_external_scope(cte_scope(cte, &anchor, context.database())?);
    SelectStatementBinder::correlated(&recursive_context, outer).bind(body)
}

/// The scope a CTE exposes, with its column list applied
fn cte_scope(cte: &CommonTableExpr, select: &SelectStatement, database: &str) -> BindResult<TableScope> {
    let mut columns = output_columns(select, &cte.name, ColumnSource::Cte, database);
    if !cte.columns.is_empty() {
        if cte.columns.len() != columns.len() {
            return Err(BindError::CteColumnCountMismatch {
                cte: cte.name.clone(),
                defined: cte.columns.len(),
                returned: columns.len(),
                span: cte.span,
            });
        }
        for (projection, name) in columns.iter_mut().zip(&cte.columns) {
            projection.column.name = name.clone();
            projection.alias = None;
        }
    }
    Ok(TableScope::new(&cte.name, TableScopeSource::Cte(cte.name.clone())).with_columns(columns))
}
