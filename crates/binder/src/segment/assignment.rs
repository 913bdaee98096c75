// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Write targets
//!
//! INSERT column lists and SET assignments name columns of the written
//! table. Those columns are resolved against the target registry only; the
//! assigned values see the full expression scope.
//!
//! A value that is a bare parameter marker fills the slot of its target
//! column, so the marker is given that column's bound info.

use sql_binder_ir::{
    ColumnAssignment, ColumnBoundInfo, ColumnSegment, Expr, InsertColumnsSegment,
    SetAssignmentSegment,
};

use crate::error::{BindError, BindResult};
use crate::scope::TableScopeRegistry;
use crate::segment::expression::ExpressionBinder;
use crate::segment::parameter_marker::ParameterMarkerCollector;

/// Resolve a written column against the target table(s)
pub fn bind_target_column(
    column: &ColumnSegment,
    target: &TableScopeRegistry,
) -> BindResult<ColumnSegment> {
    let found = target
        .find_column(column.owner.as_deref(), &column.name, column.span)?
        .ok_or_else(|| BindError::UnknownColumn {
            name: column.qualified(),
            span: column.span,
        })?;
    let mut bound = column.clone();
    bound.bound = found.column.bound.clone();
    Ok(bound)
}

pub fn bind_insert_columns(
    segment: &InsertColumnsSegment,
    target: &TableScopeRegistry,
) -> BindResult<InsertColumnsSegment> {
    Ok(InsertColumnsSegment {
        span: segment.span,
        columns: segment
            .columns
            .iter()
            .map(|column| bind_target_column(column, target))
            .collect::<BindResult<_>>()?,
    })
}

/// Bind `SET a = x, (b, c) = y`.
///
/// A bare marker value is paired with the first assigned column.
pub fn bind_set_assignments(
    segment: &SetAssignmentSegment,
    target: &TableScopeRegistry,
    values: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<SetAssignmentSegment> {
    let mut assignments = Vec::with_capacity(segment.assignments.len());
    for assignment in &segment.assignments {
        let columns = assignment
            .columns
            .iter()
            .map(|column| bind_target_column(column, target))
            .collect::<BindResult<Vec<_>>>()?;
        let value = values.bind(&assignment.value, markers)?;
        let slot = columns.first().and_then(|column| column.bound.as_ref());
        assignments.push(ColumnAssignment {
            span: assignment.span,
            value: pair_marker(value, slot, markers),
            columns,
        });
    }
    Ok(SetAssignmentSegment {
        span: segment.span,
        assignments,
    })
}

/// Give a bare marker value the bound info of the slot it fills
pub fn pair_marker(
    value: Expr,
    slot: Option<&ColumnBoundInfo>,
    markers: &mut ParameterMarkerCollector,
) -> Expr {
    match (value, slot) {
        (Expr::ParameterMarker(mut marker), Some(bound)) => {
            markers.bind_slot(marker.span, bound.clone());
            marker.bound = Some(bound.clone());
            Expr::ParameterMarker(marker)
        }
        (value, _) => value,
    }
}
