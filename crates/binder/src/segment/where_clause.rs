// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # WHERE binding

use sql_binder_ir::WhereSegment;

use crate::error::BindResult;
use crate::segment::expression::ExpressionBinder;
use crate::segment::parameter_marker::ParameterMarkerCollector;

/// Bind a WHERE predicate against the statement's scopes
pub fn bind_where(
    segment: &WhereSegment,
    expressions: &ExpressionBinder<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<WhereSegment> {
    Ok(WhereSegment {
        span: segment.span,
        expr: expressions.bind(&segment.expr, markers)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BinderContext;
    use crate::error::BindError;
    use crate::scope::OuterScopes;
    use crate::segment::fixtures::{context_metadata, order_registry};
    use sql_binder_ir::{BinaryOp, ColumnSegment, Dialect, Expr, ParameterMarker, Span};

    #[test]
    fn test_bind_where_keeps_markers_unbound() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "t_order");
        let outer = OuterScopes::empty();
        let expressions = ExpressionBinder::new(&context, &registry, &outer);

        let segment = WhereSegment::new(
            Span::new(22, 39),
            Expr::binary(
                Expr::column(ColumnSegment::new(Span::new(28, 35), "user_id")),
                BinaryOp::Eq,
                Expr::ParameterMarker(ParameterMarker::new(Span::new(39, 39), 0)),
            ),
        );
        let mut markers = ParameterMarkerCollector::new();
        let bound = bind_where(&segment, &expressions, &mut markers).unwrap();

        assert_eq!(bound.span, segment.span);
        let finished = markers.finish();
        assert_eq!(finished.len(), 1);
        assert!(finished[0].bound.is_none());
    }

    #[test]
    fn test_bind_where_unknown_column() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "t_order");
        let outer = OuterScopes::empty();
        let expressions = ExpressionBinder::new(&context, &registry, &outer);

        let segment = WhereSegment::new(
            Span::new(22, 35),
            Expr::column(ColumnSegment::new(Span::new(28, 35), "price")),
        );
        let result = bind_where(&segment, &expressions, &mut ParameterMarkerCollector::new());
        assert!(matches!(result, Err(BindError::UnknownColumn { ref name, .. }) if name == "price"));
    }
}
