// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Combined selects
//!
//! UNION / INTERSECT / EXCEPT binding.

use sql_binder_ir::{CombineSegment, SubquerySegment};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::OuterScopes;
use crate::segment::parameter_marker::ParameterMarkerCollector;
use crate::statement::select::SelectStatementBinder;

/// Bind both sides of a set operation as independent selects sharing the
/// enclosing context and outer chain
pub fn bind_combine(
    segment: &CombineSegment,
    context: &BinderContext<'_>,
    outer: &OuterScopes<'_>,
    markers: &mut ParameterMarkerCollector,
) -> BindResult<CombineSegment> {
    let binder = SelectStatementBinder::correlated(context, outer);
    let mut bind_side = |side: &SubquerySegment| -> BindResult<SubquerySegment> {
        let select = binder.bind(&side.select)?;
        markers.extend(&select.attributes.parameter_markers);
        Ok(SubquerySegment {
            span: side.span,
            select: Box::new(select),
        })
    };
    let left = bind_side(&segment.left)?;
    let right = bind_side(&segment.right)?;
    Ok(CombineSegment {
        span: segment.span,
        left,
        combine_type: segment.combine_type,
        right,
    })
}
