// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # UPDATE binding
//!
//! The target table (simple or joined), then the SET list: assigned columns
//! against the target only, values against the full scope. A bare marker
//! value carries the bound info of the first assigned column. WHERE is bound
//! against the target; WITH, ORDER BY and LIMIT are carried through as
//! written.

use sql_binder_ir::UpdateStatement;
use tracing::{debug, instrument};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::{OuterScopes, TableScopeRegistry, NO_OUTER_SCOPES};
use crate::segment::assignment::bind_set_assignments;
use crate::segment::clause::{carry_limit, carry_order_by};
use crate::segment::where_clause::bind_where;
use crate::segment::with::carry_with;
use crate::segment::{ExpressionBinder, ParameterMarkerCollector, TableSegmentBinder};

/// Binds UPDATE statements
#[derive(Debug, Clone, Copy)]
pub struct UpdateStatementBinder<'a> {
    context: &'a BinderContext<'a>,
    outer: &'a OuterScopes<'a>,
}

impl<'a> UpdateStatementBinder<'a> {
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
    pub fn bind(&self, statement: &UpdateStatement) -> BindResult<UpdateStatement> {
        debug!("Binding UPDATE statement");
        let mut markers = ParameterMarkerCollector::new();

        let mut target = TableScopeRegistry::new();
        let table = match &statement.table {
            Some(table) => Some(TableSegmentBinder::new(self.context, self.outer).bind(
                table,
                &mut target,
                &mut markers,
            )?),
            None => None,
        };

        let mut bound = self.bind_with_target(statement, &target, &mut markers)?;
        bound.table = table;
        bound.attributes.parameter_markers = markers.finish();
        Ok(bound)
    }

    /// Bind SET and the filters against an existing target registry.
    ///
    /// The returned statement keeps the input's table and marker list.
    pub fn bind_with_target(
        &self,
        statement: &UpdateStatement,
        target: &TableScopeRegistry,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<UpdateStatement> {
        let expressions = ExpressionBinder::new(self.context, target, self.outer);
        let set = bind_set_assignments(&statement.set, target, &expressions, markers)?;
        let where_clause = statement
            .where_clause
            .as_ref()
            .map(|segment| bind_where(segment, &expressions, markers))
            .transpose()?;
        let delete_where = statement
            .delete_where
            .as_ref()
            .map(|segment| bind_where(segment, &expressions, markers))
            .transpose()?;

        let order_by = statement
            .order_by
            .as_ref()
            .map(|segment| carry_order_by(segment, markers));
        let limit = statement
            .limit
            .as_ref()
            .map(|segment| carry_limit(segment, markers));
        let with = statement.with.as_ref().map(|with| carry_with(with, markers));

        Ok(UpdateStatement {
            attributes: statement.attributes.clone(),
            table: statement.table.clone(),
            set,
            where_clause,
            delete_where,
            order_by,
            limit,
            with,
        })
    }
}
