// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # INSERT binding
//!
//! The target table is bound first. Insert columns are resolved against the
//! target only; when the statement names none, the target's visible columns
//! in registration order are used. The i-th value of every VALUES row fills
//! the i-th column, so a bare marker there carries that column's bound info.
//!
//! The body binder takes an already built target registry so that a MERGE
//! can reuse it for its `WHEN NOT MATCHED THEN INSERT` branch.

use sql_binder_ir::{ColumnBoundInfo, InsertStatement, InsertValuesSegment};
use tracing::{debug, instrument};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::{OuterScopes, TableScopeRegistry, NO_OUTER_SCOPES};
use crate::segment::assignment::{bind_insert_columns, bind_set_assignments, pair_marker};
use crate::segment::where_clause::bind_where;
use crate::segment::{ExpressionBinder, ParameterMarkerCollector, TableSegmentBinder};
use crate::statement::select::SelectStatementBinder;

/// Binds INSERT statements
#[derive(Debug, Clone, Copy)]
pub struct InsertStatementBinder<'a> {
    context: &'a BinderContext<'a>,
    outer: &'a OuterScopes<'a>,
}

impl<'a> InsertStatementBinder<'a> {
    pub fn new(context: &'a BinderContext<'a>) -> Self {
        Self {
            context,
            outer: &NO_OUTER_SCOPES,
        }
    }

    pub fn correlated(context: &'a BinderContext<'a>, outer: &'a OuterScopes<'a>) -> Self {
        Self { context, outer }
    }

    #[instrument(skip_all, fields(database = %self.context.database()))]
    pub fn bind(&self, statement: &InsertStatement) -> BindResult<InsertStatement> {
        debug!("Binding INSERT statement");
        let mut target = TableScopeRegistry::new();
        let table = statement
            .table
            .as_ref()
            .map(|table| TableSegmentBinder::new(self.context, self.outer).bind_simple(table, &mut target))
            .transpose()?;

        let mut markers = ParameterMarkerCollector::new();
        let mut bound = self.bind_with_target(statement, &target, &mut markers)?;
        bound.table = table;
        bound.attributes.parameter_markers = markers.finish();
        Ok(bound)
    }

    /// Bind everything but the target table against an existing registry.
    ///
    /// The returned statement keeps the input's table and marker list; the
    /// caller owns both.
    pub fn bind_with_target(
        &self,
        statement: &InsertStatement,
        target: &TableScopeRegistry,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<InsertStatement> {
        let columns = statement
            .columns
            .as_ref()
            .map(|segment| bind_insert_columns(segment, target))
            .transpose()?;
        let slots: Vec<Option<ColumnBoundInfo>> = match &columns {
            Some(segment) => segment.columns.iter().map(|c| c.bound.clone()).collect(),
            None => target
                .iter()
                .flat_map(|scope| scope.visible_columns())
                .map(|projection| projection.column.bound.clone())
                .collect(),
        };

        let expressions = ExpressionBinder::new(self.context, target, self.outer);
        let mut values = Vec::with_capacity(statement.values.len());
        for row in &statement.values {
            let mut bound_row = Vec::with_capacity(row.values.len());
            for (i, value) in row.values.iter().enumerate() {
                let bound = expressions.bind(value, markers)?;
                let slot = slots.get(i).and_then(Option::as_ref);
                bound_row.push(pair_marker(bound, slot, markers));
            }
            values.push(InsertValuesSegment {
                span: row.span,
                values: bound_row,
            });
        }

        let select = match &statement.select {
            Some(subquery) => {
                let select = SelectStatementBinder::correlated(self.context, self.outer).bind(&subquery.select)?;
                markers.extend(&select.attributes.parameter_markers);
                let mut bound = subquery.clone();
                bound.select = Box::new(select);
                Some(bound)
            }
            None => None,
        };
        let on_duplicate_key_update = statement
            .on_duplicate_key_update
            .as_ref()
            .map(|segment| bind_set_assignments(segment, target, &expressions, markers))
            .transpose()?;
        let where_clause = statement
            .where_clause
            .as_ref()
            .map(|segment| bind_where(segment, &expressions, markers))
            .transpose()?;

        Ok(InsertStatement {
            attributes: statement.attributes.clone(),
            table: statement.table.clone(),
            columns,
            values,
            select,
            on_duplicate_key_update,
            where_clause,
        })
    }
}
