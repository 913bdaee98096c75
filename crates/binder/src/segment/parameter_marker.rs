// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Parameter markers
//!
//! Segment binders run in dependency order (FROM before the SELECT list,
//! MERGE source before its INSERT branch), not in source order. Markers are
//! therefore collected as they are met, slots are recorded separately as the
//! statement binder pairs values with columns, and both are merged at the end
//! into one list ordered by source offset.

use sql_binder_ir::{ColumnBoundInfo, Expr, ParameterMarker, Span};
use std::collections::HashMap;

/// Markers met while binding one statement
#[derive(Debug, Default)]
pub struct ParameterMarkerCollector {
    markers: Vec<ParameterMarker>,
    slots: HashMap<Span, ColumnBoundInfo>,
}

impl ParameterMarkerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a marker occurrence
    pub fn collect(&mut self, marker: &ParameterMarker) {
        self.markers.push(marker.clone());
    }

    /// Record the markers of a nested, already bound statement
    pub fn extend<'m>(&mut self, markers: impl IntoIterator<Item = &'m ParameterMarker>) {
        self.markers.extend(markers.into_iter().cloned());
    }

    /// Record the markers of an expression that is carried through unbound.
    ///
    /// Nested selects are not walked; their recorded marker lists are used.
    pub fn collect_unbound(&mut self, expr: &Expr) {
        match expr {
            Expr::ParameterMarker(marker) => self.collect(marker),
            Expr::Column(_) | Expr::Literal { .. } => {}
            Expr::BinaryOp { left, right, .. } => {
                self.collect_unbound(left);
                self.collect_unbound(right);
            }
            Expr::UnaryOp { expr, .. } | Expr::Cast { expr, .. } | Expr::Paren(expr) => {
                self.collect_unbound(expr)
            }
            Expr::Function { args, .. } | Expr::List(args) => {
                args.iter().for_each(|arg| self.collect_unbound(arg))
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
                ..
            } => {
                operand.iter().for_each(|e| self.collect_unbound(e));
                conditions.iter().for_each(|e| self.collect_unbound(e));
                results.iter().for_each(|e| self.collect_unbound(e));
                else_result.iter().for_each(|e| self.collect_unbound(e));
            }
            Expr::Between { expr, low, high, .. } => {
                self.collect_unbound(expr);
                self.collect_unbound(low);
                self.collect_unbound(high);
            }
            Expr::InList { expr, list, .. } => {
                self.collect_unbound(expr);
                list.iter().for_each(|e| self.collect_unbound(e));
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.collect_unbound(expr);
                self.extend(&subquery.select.attributes.parameter_markers);
            }
            Expr::Exists { subquery, .. } | Expr::Subquery(subquery) => {
                self.extend(&subquery.select.attributes.parameter_markers)
            }
        }
    }

    /// Record the column slot the marker at `span` fills
    pub fn bind_slot(&mut self, span: Span, bound: ColumnBoundInfo) {
        self.slots.insert(span, bound);
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Markers ordered by source offset, each carrying its slot's bound info.
    ///
    /// A marker without a recorded slot keeps whatever it already carried.
    pub fn finish(self) -> Vec<ParameterMarker> {
        let Self { mut markers, slots } = self;
        markers.sort_by_key(|marker| marker.span);
        markers.dedup_by_key(|marker| marker.span);
        for marker in &mut markers {
            if let Some(bound) = slots.get(&marker.span) {
                marker.bound = Some(bound.clone());
            }
        }
        markers
    }
}
