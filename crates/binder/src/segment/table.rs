// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Table binding
//!
//! Binds one `FROM` item and registers what it exposes:
//!
//! - **Simple table**: looked up in the metadata, or in the external scopes
//!   when it names a CTE. Every catalog column is registered, visible unless
//!   the catalog hides it.
//! - **Derived table**: the subquery is bound as a nested statement; its
//!   output columns are registered under its alias.
//! - **Join**: left, then right into the same registry, then the condition
//!   against everything registered so far.

use sql_binder_ir::{
    ColumnBoundInfo, ColumnProjection, ColumnSegment, ColumnSource, JoinTableSegment,
    SimpleTableSegment, SubqueryTableSegment, TableBoundInfo, TableSegment,
};
use tracing::debug;

use crate::context::BinderContext;
use crate::error::{BindError, BindResult};
use crate::scope::{OuterScopes, TableScope, TableScopeRegistry, TableScopeSource};
use crate::segment::expression::ExpressionBinder;
use crate::segment::parameter_marker::ParameterMarkerCollector;
use crate::segment::projection::output_columns;
use crate::statement::select::SelectStatementBinder;

/// Binds table segments into a registry
#[derive(Debug, Clone, Copy)]
pub struct TableSegmentBinder<'b> {
    context: &'b BinderContext<'b>,
    outer: &'b OuterScopes<'b>,
}

impl<'b> TableSegmentBinder<'b> {
    pub fn new(context: &'b BinderContext<'b>, outer: &'b OuterScopes<'b>) -> Self {
        Self { context, outer }
    }

    /// Bind `table` and register its scopes into `registry`
    ///
    /// # Errors
    ///
    /// - `UnknownDatabase` / `UnknownTable` for unresolvable simple tables
    /// - `DuplicateTableAlias` if a name is already registered
    /// - any error of a nested subquery or join condition
    pub fn bind(
        &self,
        table: &TableSegment,
        registry: &mut TableScopeRegistry,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<TableSegment> {
        match table {
            TableSegment::Simple(simple) => self.bind_simple(simple, registry).map(TableSegment::from),
            TableSegment::Subquery(subquery) => self
                .bind_subquery(subquery, registry, markers)
                .map(TableSegment::from),
            TableSegment::Join(join) => self.bind_join(join, registry, markers).map(TableSegment::from),
        }
    }

    pub fn bind_simple(
        &self,
        table: &SimpleTableSegment,
        registry: &mut TableScopeRegistry,
    ) -> BindResult<SimpleTableSegment> {
        let name = table.alias_or_name();

        if table.name.owner.is_none() {
            if let Some(cte) = self.context.external_scopes().get(&table.name.name) {
                if let TableScopeSource::Cte(cte_name) = &cte.source {
                    let scope = cte.renamed(name, TableScopeSource::Cte(cte_name.clone()));
                    registry.register(scope, table.span)?;
                    return Ok(table.clone());
                }
            }
        }

        let (database, metadata) =
            self.context
                .resolve_table(table.name.owner.as_deref(), &table.name.name, table.span)?;
        let bound = TableBoundInfo::new(database, &metadata.schema).with_type(metadata.table_type.clone());

        let columns = metadata
            .columns
            .iter()
            .map(|column| {
                let segment = ColumnSegment::new(table.span, &column.name)
                    .with_owner(name)
                    .with_bound(
                        ColumnBoundInfo::new(database, &metadata.schema, &metadata.name, &column.name)
                            .with_data_type(Some(column.data_type.clone())),
                    );
                ColumnProjection::new(segment).with_visible(column.visible)
            })
            .collect();
        let scope = TableScope::new(
            name,
            TableScopeSource::Table {
                table: metadata.name.clone(),
                bound: bound.clone(),
            },
        )
        .with_columns(columns);
        registry.register(scope, table.span)?;

        debug!(table = %metadata.name, alias = %name, database, "Bound table");
        let mut bound_table = table.clone();
        bound_table.bound = Some(bound);
        Ok(bound_table)
    }

    fn bind_subquery(
        &self,
        table: &SubqueryTableSegment,
        registry: &mut TableScopeRegistry,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<SubqueryTableSegment> {
        let alias = table
            .alias
            .clone()
            .unwrap_or_else(|| format!("subquery_{}", table.span.start));

        let select = if table.lateral && self.context.lateral_derived_tables() {
            let outer = self.outer.push(registry);
            SelectStatementBinder::correlated(self.context, &outer).bind(&table.subquery.select)?
        } else {
            SelectStatementBinder::correlated(self.context, self.outer).bind(&table.subquery.select)?
        };
        markers.extend(&select.attributes.parameter_markers);

        let columns = output_columns(&select, &alias, ColumnSource::Subquery, self.context.database());
        registry.register(
            TableScope::new(&alias, TableScopeSource::Subquery).with_columns(columns),
            table.span,
        )?;

        let mut bound = table.clone();
        bound.subquery.select = Box::new(select);
        Ok(bound)
    }

    fn bind_join(
        &self,
        join: &JoinTableSegment,
        registry: &mut TableScopeRegistry,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<JoinTableSegment> {
        let left = self.bind(&join.left, registry, markers)?;
        let left_scopes = registry.clone();
        let right = self.bind(&join.right, registry, markers)?;

        let condition = match &join.condition {
            Some(condition) => Some(
                ExpressionBinder::new(self.context, registry, self.outer).bind(condition, markers)?,
            ),
            None => None,
        };
        let using = join
            .using
            .iter()
            .map(|column| bind_using_column(column, &left_scopes, registry))
            .collect::<BindResult<Vec<_>>>()?;

        Ok(JoinTableSegment {
            span: join.span,
            left: Box::new(left),
            right: Box::new(right),
            join_type: join.join_type,
            natural: join.natural,
            condition,
            using,
        })
    }
}

/// A `USING` column must exist on both sides; it is bound to the left one
fn bind_using_column(
    column: &ColumnSegment,
    left_scopes: &TableScopeRegistry,
    registry: &TableScopeRegistry,
) -> BindResult<ColumnSegment> {
    let unknown = || BindError::UnknownColumn {
        name: column.name.clone(),
        span: column.span,
    };
    let left = left_scopes
        .find_column(None, &column.name, column.span)?
        .ok_or_else(unknown)?;

    let mut right_scopes = TableScopeRegistry::new();
    for scope in registry.iter().filter(|scope| !left_scopes.contains(&scope.name)) {
        right_scopes.shadow(scope.clone());
    }
    right_scopes
        .find_column(None, &column.name, column.span)?
        .ok_or_else(unknown)?;

    let mut bound = column.clone();
    bound.bound = left.column.bound.clone();
    Ok(bound)
}
