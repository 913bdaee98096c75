// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # SELECT binding
//!
//! Phases, each depending only on earlier ones:
//!
//! 1. WITH: every CTE becomes an external scope of this statement
//! 2. FROM: builds the statement's registry
//! 3. SELECT list, WHERE, LOCK: strict, against the registry
//! 4. GROUP BY, HAVING, ORDER BY, WINDOW, LIMIT: lenient. ORDER BY prefers
//!    SELECT-list aliases; the grouping clauses prefer table columns
//! 5. COMBINE: both sides bound as independent selects
//!
//! Besides the top-level entry point there are two nested ones: a correlated
//! subquery sees the registries of its enclosing statements, and a select
//! bound with external scopes sees an extra caller-supplied layer.

use sql_binder_ir::SelectStatement;
use tracing::{debug, instrument};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::{OuterScopes, TableScopeRegistry, NO_OUTER_SCOPES};
use crate::segment::clause::{bind_group_by, bind_having, bind_limit, bind_order_by, bind_window};
use crate::segment::combine::bind_combine;
use crate::segment::lock::bind_lock;
use crate::segment::where_clause::bind_where;
use crate::segment::with::bind_with;
use crate::segment::{
    ExpressionBinder, ParameterMarkerCollector, ProjectionsSegmentBinder, TableSegmentBinder,
};

/// Binds SELECT statements
#[derive(Debug, Clone, Copy)]
pub struct SelectStatementBinder<'a> {
    context: &'a BinderContext<'a>,
    outer: &'a OuterScopes<'a>,
}

impl<'a> SelectStatementBinder<'a> {
    /// A binder for a top-level select
    pub fn new(context: &'a BinderContext<'a>) -> Self {
        Self {
            context,
            outer: &NO_OUTER_SCOPES,
        }
    }

    /// A binder for a select nested in statements whose registries are `outer`
    pub fn correlated(context: &'a BinderContext<'a>, outer: &'a OuterScopes<'a>) -> Self {
        Self { context, outer }
    }

    /// Bind a correlated subquery of a statement whose registry is `enclosing`
    pub fn bind_correlated_subquery(
        &self,
        statement: &SelectStatement,
        enclosing: &TableScopeRegistry,
    ) -> BindResult<SelectStatement> {
        let outer = self.outer.push(enclosing);
        SelectStatementBinder::correlated(self.context, &outer).bind(statement)
    }

    /// Bind with `scopes` added to the context's external scopes
    pub fn bind_with_external_scopes(
        &self,
        statement: &SelectStatement,
        scopes: &TableScopeRegistry,
    ) -> BindResult<SelectStatement> {
        let context = self.context.with_external_scopes(scopes);
        SelectStatementBinder::correlated(&context, self.outer).bind(statement)
    }

    /// Bind `statement` into a new tree. The input is not modified.
    #[instrument(skip_all, fields(database = %self.context.database(), nested = !self.outer.is_empty()))]
    pub fn bind(&self, statement: &SelectStatement) -> BindResult<SelectStatement> {
        debug!("Binding SELECT statement");
        let mut context = self.context.clone();
        let mut markers = ParameterMarkerCollector::new();

        let with = match &statement.with {
            Some(with) => Some(bind_with(with, &mut context, self.outer, &mut markers)?),
            None => None,
        };

        let mut registry = TableScopeRegistry::new();
        let from = match &statement.from {
            Some(from) => Some(TableSegmentBinder::new(&context, self.outer).bind(
                from,
                &mut registry,
                &mut markers,
            )?),
            None => None,
        };

        let expressions = ExpressionBinder::new(&context, &registry, self.outer);
        let projections =
            ProjectionsSegmentBinder::new(expressions).bind(&statement.projections, &mut markers)?;
        let where_clause = statement
            .where_clause
            .as_ref()
            .map(|segment| bind_where(segment, &expressions, &mut markers))
            .transpose()?;
        let lock = statement
            .lock
            .as_ref()
            .map(|segment| bind_lock(segment, &expressions))
            .transpose()?;

        let clauses = expressions.lenient(&projections.projections);
        let grouping = clauses.columns_before_aliases();
        let group_by = statement
            .group_by
            .as_ref()
            .map(|segment| bind_group_by(segment, &grouping, &mut markers))
            .transpose()?;
        let having = statement
            .having
            .as_ref()
            .map(|segment| bind_having(segment, &grouping, &mut markers))
            .transpose()?;
        let order_by = statement
            .order_by
            .as_ref()
            .map(|segment| bind_order_by(segment, &clauses, &mut markers))
            .transpose()?;
        let window = statement
            .window
            .as_ref()
            .map(|segment| bind_window(segment, &grouping, &mut markers))
            .transpose()?;
        let limit = statement
            .limit
            .as_ref()
            .map(|segment| bind_limit(segment, &clauses, &mut markers))
            .transpose()?;

        let combine = statement
            .combine
            .as_ref()
            .map(|segment| bind_combine(segment, &context, self.outer, &mut markers))
            .transpose()?;

        let mut attributes = statement.attributes.clone();
        attributes.parameter_markers = markers.finish();

        Ok(SelectStatement {
            attributes,
            with,
            projections,
            from,
            where_clause,
            group_by,
            having,
            order_by,
            combine,
            limit,
            lock,
            window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use crate::segment::fixtures::{context_metadata, order_registry};
    use sql_binder_ir::{
        BinaryOp, ColumnSegment, Dialect, Expr, Projection, ProjectionsSegment, SimpleTableSegment,
        Span, WhereSegment,
    };

    fn inner_select() -> SelectStatement {
        SelectStatement::new(Dialect::MySQL)
            .with_projections(ProjectionsSegment::new(
                Span::new(8, 16),
                vec![Projection::column(ColumnSegment::new(Span::new(8, 16), "price").with_owner("i"))],
            ))
            .with_from(SimpleTableSegment::new(Span::new(23, 36), "t_order_item").with_alias("i"))
            .with_where(WhereSegment::new(
                Span::new(38, 66),
                Expr::binary(
                    Expr::column(ColumnSegment::new(Span::new(44, 53), "order_id").with_owner("i")),
                    BinaryOp::Eq,
                    Expr::column(ColumnSegment::new(Span::new(57, 66), "order_id").with_owner("o")),
                ),
            ))
    }

    #[test]
    fn test_bind_correlated_subquery() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let enclosing = order_registry(&context, "o");

        let binder = SelectStatementBinder::new(&context);
        let bound = binder.bind_correlated_subquery(&inner_select(), &enclosing).unwrap();
        let where_clause = bound.where_clause.unwrap();
        let mut tables = Vec::new();
        where_clause
            .expr
            .visit_columns(&mut |c| tables.push(c.bound.clone().unwrap().table));
        assert_eq!(tables, vec!["t_order_item", "t_order"]);

        let uncorrelated = binder.bind(&inner_select());
        assert!(matches!(
            uncorrelated,
            Err(BindError::UnknownColumn { ref name, .. }) if name == "o.order_id"
        ));
    }

    #[test]
    fn test_bind_with_external_scopes() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::Oracle);
        let external = order_registry(&context, "o");

        let bound = SelectStatementBinder::new(&context)
            .bind_with_external_scopes(&inner_select(), &external)
            .unwrap();
        assert!(bound.where_clause.is_some());
        assert!(context.external_scopes().is_empty());
    }
}
