// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Projection binding
//!
//! Binds the SELECT list in source order. `*` and `owner.*` are expanded from
//! the registry, which is the only place the number of projections can
//! change.

use sql_binder_ir::{
    ColumnBoundInfo, ColumnProjection, ColumnSegment, ColumnSource, Expr, ExpressionProjection,
    Projection, ProjectionsSegment, SelectStatement, ShorthandProjection,
};

use crate::error::{BindError, BindResult};
use crate::segment::expression::{infer_data_type, ExpressionBinder};
use crate::segment::parameter_marker::ParameterMarkerCollector;

/// Binds a SELECT list
pub struct ProjectionsSegmentBinder<'b> {
    expressions: ExpressionBinder<'b>,
}

impl<'b> ProjectionsSegmentBinder<'b> {
    pub fn new(expressions: ExpressionBinder<'b>) -> Self {
        Self { expressions }
    }

    pub fn bind(
        &self,
        segment: &ProjectionsSegment,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<ProjectionsSegment> {
        let mut projections = Vec::with_capacity(segment.projections.len());
        for projection in &segment.projections {
            match projection {
                Projection::Column(column) => {
                    projections.push(Projection::Column(ColumnProjection {
                        column: self.expressions.bind_column(&column.column)?,
                        alias: column.alias.clone(),
                        visible: column.visible,
                    }));
                }
                Projection::Expression(expression) => {
                    projections.push(self.bind_expression(expression, markers)?);
                }
                Projection::Shorthand(shorthand) => {
                    projections.extend(self.expand_shorthand(shorthand)?);
                }
            }
        }
        Ok(ProjectionsSegment {
            span: segment.span,
            distinct: segment.distinct,
            projections,
        })
    }

    fn bind_expression(
        &self,
        projection: &ExpressionProjection,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<Projection> {
        if let Expr::Column(column) = &projection.expr {
            return Ok(Projection::Column(ColumnProjection {
                column: self.expressions.bind_column(column)?,
                alias: projection.alias.clone(),
                visible: true,
            }));
        }
        Ok(Projection::Expression(ExpressionProjection {
            span: projection.span,
            expr: self.expressions.bind(&projection.expr, markers)?,
            alias: projection.alias.clone(),
        }))
    }

    fn expand_shorthand(&self, shorthand: &ShorthandProjection) -> BindResult<Vec<Projection>> {
        let registry = self.expressions.registry();
        let scopes: Vec<_> = match &shorthand.owner {
            Some(owner) => {
                let scope = registry.get(owner).ok_or_else(|| BindError::UnknownTable {
                    name: owner.clone(),
                    span: shorthand.span,
                })?;
                vec![scope]
            }
            None => registry.iter().collect(),
        };

        Ok(scopes
            .into_iter()
            .flat_map(|scope| scope.visible_columns())
            .map(|projection| {
                let mut column = projection.column.clone();
                column.span = shorthand.span;
                Projection::Column(ColumnProjection::new(column))
            })
            .collect())
    }
}

/// Columns a bound select exposes to an enclosing statement as `owner`.
///
/// Columns read from a catalog table keep their origin and are marked as
/// coming through `source`. Unaliased computed columns are named `col_<n>`.
pub(crate) fn output_columns(
    select: &SelectStatement,
    owner: &str,
    source: ColumnSource,
    database: &str,
) -> Vec<ColumnProjection> {
    if select.projections.projections.is_empty() {
        if let Some(combine) = &select.combine {
            return output_columns(&combine.left.select, owner, source, database);
        }
    }

    select
        .projections
        .projections
        .iter()
        .enumerate()
        .filter_map(|(i, projection)| match projection {
            Projection::Column(p) => {
                let mut column = ColumnSegment::new(p.column.span, p.output_name()).with_owner(owner);
                column.bound = p.column.bound.clone().map(|bound| match bound.source {
                    ColumnSource::Table => bound.with_source(source),
                    _ => bound,
                });
                Some(ColumnProjection::new(column).with_visible(p.visible))
            }
            Projection::Expression(p) => {
                let name = p.alias.clone().unwrap_or_else(|| format!("col_{}", i + 1));
                let bound = ColumnBoundInfo::new(database, "", "", &name)
                    .with_source(ColumnSource::Expression)
                    .with_data_type(infer_data_type(&p.expr));
                Some(ColumnProjection::new(
                    ColumnSegment::new(p.span, name).with_owner(owner).with_bound(bound),
                ))
            }
            Projection::Shorthand(_) => None,
        })
        .collect()
}
