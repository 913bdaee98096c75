// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Row locks
//!
//! `FOR UPDATE OF ...` binding.

use sql_binder_ir::{LockSegment, SimpleTableSegment};

use crate::error::{BindError, BindResult};
use crate::scope::TableScopeSource;
use crate::segment::expression::ExpressionBinder;

/// Bind the tables and columns a locking clause names.
///
/// Locked tables must be registered in the statement's own FROM.
pub fn bind_lock(segment: &LockSegment, expressions: &ExpressionBinder<'_>) -> BindResult<LockSegment> {
    let tables = segment
        .tables
        .iter()
        .map(|table| bind_locked_table(table, expressions))
        .collect::<BindResult<_>>()?;
    let columns = segment
        .columns
        .iter()
        .map(|column| expressions.bind_column(column))
        .collect::<BindResult<_>>()?;
    Ok(LockSegment {
        span: segment.span,
        strength: segment.strength,
        tables,
        columns,
    })
}

fn bind_locked_table(
    table: &SimpleTableSegment,
    expressions: &ExpressionBinder<'_>,
) -> BindResult<SimpleTableSegment> {
    let scope = expressions
        .registry()
        .get(table.alias_or_name())
        .ok_or_else(|| BindError::UnknownTable {
            name: table.alias_or_name().to_string(),
            span: table.span,
        })?;
    let mut bound = table.clone();
    if let TableScopeSource::Table { bound: info, .. } = &scope.source {
        bound.bound = Some(info.clone());
    }
    Ok(bound)
}
