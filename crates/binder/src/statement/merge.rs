// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # MERGE binding
//!
//! Target and source are bound into separate registries. The ON expression
//! sees both. The INSERT and UPDATE branches write to the target and read the
//! source through the context's external scopes, so `VALUES (s.id)` resolves
//! even though `s` is not in the branch's own registry. Both branches come
//! back carrying the bound target as their table.
//!
//! The statement's marker list holds the markers of the source subquery's
//! SELECT list and those of the INSERT and UPDATE branches. Markers in the
//! ON expression or elsewhere in the source are not listed.

use sql_binder_ir::{MergeStatement, ParameterMarker, TableSegment};
use tracing::{debug, instrument};

use crate::context::BinderContext;
use crate::error::BindResult;
use crate::scope::{TableScopeRegistry, NO_OUTER_SCOPES};
use crate::segment::{ExpressionBinder, ParameterMarkerCollector, TableSegmentBinder};
use crate::statement::insert::InsertStatementBinder;
use crate::statement::update::UpdateStatementBinder;

/// Binds MERGE statements
#[derive(Debug, Clone, Copy)]
pub struct MergeStatementBinder<'a> {
    context: &'a BinderContext<'a>,
}

impl<'a> MergeStatementBinder<'a> {
    pub fn new(context: &'a BinderContext<'a>) -> Self {
        Self { context }
    }

    #[instrument(skip_all, fields(database = %self.context.database()))]
    pub fn bind(&self, statement: &MergeStatement) -> BindResult<MergeStatement> {
        debug!("Binding MERGE statement");
        let outer = &NO_OUTER_SCOPES;
        let tables = TableSegmentBinder::new(self.context, outer);
        let mut unlisted = ParameterMarkerCollector::new();

        let mut target_registry = TableScopeRegistry::new();
        let target = tables.bind(&statement.target, &mut target_registry, &mut unlisted)?;
        let mut source_registry = TableScopeRegistry::new();
        let source = tables.bind(&statement.source, &mut source_registry, &mut unlisted)?;

        let mut on_registry = target_registry.clone();
        on_registry.register_all(&source_registry, statement.source.span())?;
        let on = statement
            .on
            .as_ref()
            .map(|on| ExpressionBinder::new(self.context, &on_registry, outer).bind(on, &mut unlisted))
            .transpose()?;

        let branch_context = self.context.with_external_scopes(&source_registry);
        let mut markers = ParameterMarkerCollector::new();
        markers.extend(source_projection_markers(&source));

        let insert = match &statement.insert {
            Some(insert) => {
                let mut branch = ParameterMarkerCollector::new();
                let mut bound = InsertStatementBinder::correlated(&branch_context, outer)
                    .bind_with_target(insert, &target_registry, &mut branch)?;
                if let TableSegment::Simple(table) = &target {
                    bound.table = Some(table.clone());
                }
                bound.attributes.parameter_markers = branch.finish();
                markers.extend(&bound.attributes.parameter_markers);
                Some(bound)
            }
            None => None,
        };
        let update = match &statement.update {
            Some(update) => {
                let mut branch = ParameterMarkerCollector::new();
                let mut bound = UpdateStatementBinder::correlated(&branch_context, outer)
                    .bind_with_target(update, &target_registry, &mut branch)?;
                bound.table = Some(target.clone());
                bound.attributes.parameter_markers = branch.finish();
                markers.extend(&bound.attributes.parameter_markers);
                Some(bound)
            }
            None => None,
        };

        let mut attributes = statement.attributes.clone();
        attributes.parameter_markers = markers.finish();
        Ok(MergeStatement {
            attributes,
            target,
            source,
            on,
            insert,
            update,
        })
    }
}

/// Markers written in the SELECT list of a derived-table source
fn source_projection_markers(source: &TableSegment) -> impl Iterator<Item = &ParameterMarker> {
    let select = match source {
        TableSegment::Subquery(subquery) => Some(&subquery.subquery.select),
        _ => None,
    };
    select.into_iter().flat_map(|select| {
        let projections = select.projections.span;
        select
            .attributes
            .parameter_markers
            .iter()
            .filter(move |marker| projections.contains(&marker.span))
    })
}
