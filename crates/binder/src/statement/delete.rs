// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # DELETE binding
//!
//! The target table, then WHERE against it. WITH, ORDER BY, LIMIT and OUTPUT
//! are carried through as written; only their parameter markers enter the
//! statement's list.

use sql_binder_ir::DeleteStatement;
use tracing::{debug, instrument};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::{OuterScopes, TableScopeRegistry, NO_OUTER_SCOPES};
use crate::segment::clause::{carry_limit, carry_order_by};
use crate::segment::where_clause::bind_where;
use crate::segment::with::carry_with;
use crate::segment::{ExpressionBinder, ParameterMarkerCollector, TableSegmentBinder};

/// Binds DELETE statements
#[derive(Debug, Clone, Copy)]
pub struct DeleteStatementBinder<'a> {
    context: &'a BinderContext<'a>,
    outer: &'a OuterScopes<'a>,
}

impl<'a> DeleteStatementBinder<'a> {
    pub fn new(context: &'a BinderContext<'a>) -> Self {
        Self {
            context,
            outer: &NO_OUTER_SCOPES,
        }
    }

    #[instrument(skip_all, fields(database = %self.context.database()))]
    pub fn bind(&self, statement: &DeleteStatement) -> BindResult<DeleteStatement> {
        debug!("Binding DELETE statement");
        let mut markers = ParameterMarkerCollector::new();
        let with = statement.with.as_ref().map(|with| carry_with(with, &mut markers));

        let mut registry = TableScopeRegistry::new();
        let table = TableSegmentBinder::new(self.context, self.outer).bind(
            &statement.table,
            &mut registry,
            &mut markers,
        )?;

        let expressions = ExpressionBinder::new(self.context, &registry, self.outer);
        let where_clause = statement
            .where_clause
            .as_ref()
            .map(|segment| bind_where(segment, &expressions, &mut markers))
            .transpose()?;

        let order_by = statement
            .order_by
            .as_ref()
            .map(|segment| carry_order_by(segment, &mut markers));
        let limit = statement
            .limit
            .as_ref()
            .map(|segment| carry_limit(segment, &mut markers));
        if statement.output.is_some() {
            debug!(segment = "OUTPUT", "Passing segment through unbound");
        }

        let mut attributes = statement.attributes.clone();
        attributes.parameter_markers = markers.finish();
        Ok(DeleteStatement {
            attributes,
            table,
            where_clause,
            order_by,
            limit,
            with,
            output: statement.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use crate::segment::fixtures::context_metadata;
    use sql_binder_ir::{
        BinaryOp, ColumnSegment, CommentSegment, Dialect, Expr, LimitSegment, OrderByItem,
        OrderBySegment, OutputSegment, ParameterMarker, SimpleTableSegment, Span,
        StatementAttributes, WhereSegment,
    };

    #[test]
    fn test_bind_delete() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::SQLServer);

        let mut statement = DeleteStatement::new(
            Dialect::SQLServer,
            SimpleTableSegment::new(Span::new(12, 18), "t_order"),
        )
        .with_where(WhereSegment::new(
            Span::new(20, 37),
            Expr::binary(
                Expr::column(ColumnSegment::new(Span::new(26, 33), "order_id")),
                BinaryOp::Eq,
                Expr::ParameterMarker(ParameterMarker::new(Span::new(37, 37), 0)),
            ),
        ));
        statement.output = Some(OutputSegment {
            span: Span::new(40, 60),
            columns: vec![ColumnSegment::new(Span::new(47, 60), "order_id").with_owner("deleted")],
        });
        statement.attributes = StatementAttributes::new(Dialect::SQLServer).with_comments(vec![CommentSegment {
            span: Span::new(62, 75),
            text: "/* audit */".to_string(),
        }]);

        let bound = DeleteStatementBinder::new(&context).bind(&statement).unwrap();
        assert_eq!(bound.attributes.parameter_markers.len(), 1);
        assert_eq!(bound.attributes.comments, statement.attributes.comments);
        assert_eq!(bound.output, statement.output);
        assert!(bound.where_clause.is_some());
    }

    #[test]
    fn test_bind_delete_carries_order_by_and_limit() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);

        let mut statement = DeleteStatement::new(
            Dialect::MySQL,
            SimpleTableSegment::new(Span::new(12, 18), "t_order"),
        );
        statement.order_by = Some(OrderBySegment {
            span: Span::new(20, 36),
            items: vec![OrderByItem::new(Expr::column(ColumnSegment::new(Span::new(29, 36), "order_id")))],
        });
        statement.limit = Some(LimitSegment {
            span: Span::new(38, 44),
            row_count: Some(Expr::ParameterMarker(ParameterMarker::new(Span::new(44, 44), 0))),
            offset: None,
        });

        let bound = DeleteStatementBinder::new(&context).bind(&statement).unwrap();
        assert_eq!(bound.order_by, statement.order_by);
        assert_eq!(bound.limit, statement.limit);
        assert_eq!(bound.attributes.parameter_markers.len(), 1);
    }

    #[test]
    fn test_bind_delete_unknown_table() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);

        let statement = DeleteStatement::new(
            Dialect::MySQL,
            SimpleTableSegment::new(Span::new(12, 20), "t_missing"),
        );
        assert!(matches!(
            DeleteStatementBinder::new(&context).bind(&statement),
            Err(BindError::UnknownTable { .. })
        ));
    }
}
