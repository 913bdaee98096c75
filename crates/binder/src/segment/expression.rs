// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Column and expression binding
//!
//! Rebuilds an expression tree with every column leaf bound. Column lookup
//! walks three layers and stops at the first one with a match:
//!
//! 1. the statement's own [`TableScopeRegistry`]
//! 2. the context's external scopes (CTEs, the MERGE source)
//! 3. the [`OuterScopes`] of enclosing statements, nearest first
//!
//! Within one layer an unqualified name exposed by two scopes is ambiguous.
//! A lenient binder also knows the SELECT-list aliases, tried before the
//! layers for ORDER BY and after them for the grouping clauses.
//!
//! Subqueries are bound as nested statements with the current registry
//! pushed onto the outer chain, so they may correlate with this statement.

use sql_binder_ir::{
    BinaryOp, ColumnBoundInfo, ColumnSegment, ColumnSource, DataType, Expr, Literal, Projection,
    SubquerySegment, UnaryOp,
};
use tracing::debug;

use crate::context::BinderContext;
use crate::error::{BindError, BindResult};
use crate::scope::{OuterScopes, TableScopeRegistry};
use crate::segment::parameter_marker::ParameterMarkerCollector;
use crate::statement::select::SelectStatementBinder;

/// Binds expressions against one statement's scopes
#[derive(Debug, Clone, Copy)]
pub struct ExpressionBinder<'b> {
    context: &'b BinderContext<'b>,
    registry: &'b TableScopeRegistry,
    outer: &'b OuterScopes<'b>,
    lenient: bool,
    aliases: &'b [Projection],
    aliases_first: bool,
}

impl<'b> ExpressionBinder<'b> {
    pub fn new(
        context: &'b BinderContext<'b>,
        registry: &'b TableScopeRegistry,
        outer: &'b OuterScopes<'b>,
    ) -> Self {
        Self {
            context,
            registry,
            outer,
            lenient: false,
            aliases: &[],
            aliases_first: false,
        }
    }

    /// A binder for ORDER BY / LIMIT.
    ///
    /// Unqualified names are first matched against the aliases of the bound
    /// `projections`. Unless strict clause binding is configured, a column
    /// that resolves to nothing is left unbound instead of failing.
    pub fn lenient(mut self, projections: &'b [Projection]) -> Self {
        self.lenient = true;
        self.aliases = projections;
        self.aliases_first = true;
        self
    }

    /// The same binder for GROUP BY / HAVING / WINDOW: table columns win,
    /// SELECT-list aliases are only tried when no layer knows the name.
    pub fn columns_before_aliases(mut self) -> Self {
        self.aliases_first = false;
        self
    }

    pub fn context(&self) -> &'b BinderContext<'b> {
        self.context
    }

    pub fn registry(&self) -> &'b TableScopeRegistry {
        self.registry
    }

    pub fn outer(&self) -> &'b OuterScopes<'b> {
        self.outer
    }

    /// Bind every column leaf of `expr`, collecting parameter markers
    pub fn bind(&self, expr: &Expr, markers: &mut ParameterMarkerCollector) -> BindResult<Expr> {
        let bound = match expr {
            Expr::Column(column) => Expr::Column(self.bind_column(column)?),
            Expr::Literal { .. } => expr.clone(),
            Expr::ParameterMarker(marker) => {
                markers.collect(marker);
                expr.clone()
            }
            Expr::BinaryOp {
                span,
                left,
                op,
                right,
            } => Expr::BinaryOp {
                span: *span,
                left: Box::new(self.bind(left, markers)?),
                op: *op,
                right: Box::new(self.bind(right, markers)?),
            },
            Expr::UnaryOp { span, op, expr } => Expr::UnaryOp {
                span: *span,
                op: *op,
                expr: Box::new(self.bind(expr, markers)?),
            },
            Expr::Function {
                span,
                name,
                args,
                distinct,
            } => Expr::Function {
                span: *span,
                name: name.clone(),
                args: self.bind_all(args, markers)?,
                distinct: *distinct,
            },
            Expr::Case {
                span,
                operand,
                conditions,
                results,
                else_result,
            } => Expr::Case {
                span: *span,
                operand: self.bind_boxed(operand.as_deref(), markers)?,
                conditions: self.bind_all(conditions, markers)?,
                results: self.bind_all(results, markers)?,
                else_result: self.bind_boxed(else_result.as_deref(), markers)?,
            },
            Expr::Cast {
                span,
                expr,
                type_name,
            } => Expr::Cast {
                span: *span,
                expr: Box::new(self.bind(expr, markers)?),
                type_name: type_name.clone(),
            },
            Expr::Between {
                span,
                expr,
                low,
                high,
                negated,
            } => Expr::Between {
                span: *span,
                expr: Box::new(self.bind(expr, markers)?),
                low: Box::new(self.bind(low, markers)?),
                high: Box::new(self.bind(high, markers)?),
                negated: *negated,
            },
            Expr::InList {
                span,
                expr,
                list,
                negated,
            } => Expr::InList {
                span: *span,
                expr: Box::new(self.bind(expr, markers)?),
                list: self.bind_all(list, markers)?,
                negated: *negated,
            },
            Expr::InSubquery {
                span,
                expr,
                subquery,
                negated,
            } => Expr::InSubquery {
                span: *span,
                expr: Box::new(self.bind(expr, markers)?),
                subquery: self.bind_subquery(subquery, markers)?,
                negated: *negated,
            },
            Expr::Exists {
                span,
                subquery,
                negated,
            } => Expr::Exists {
                span: *span,
                subquery: self.bind_subquery(subquery, markers)?,
                negated: *negated,
            },
            Expr::Subquery(subquery) => Expr::Subquery(self.bind_subquery(subquery, markers)?),
            Expr::Paren(inner) => Expr::Paren(Box::new(self.bind(inner, markers)?)),
            Expr::List(items) => Expr::List(self.bind_all(items, markers)?),
        };
        Ok(bound)
    }

    fn bind_all(
        &self,
        exprs: &[Expr],
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<Vec<Expr>> {
        exprs.iter().map(|expr| self.bind(expr, markers)).collect()
    }

    fn bind_boxed(
        &self,
        expr: Option<&Expr>,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<Option<Box<Expr>>> {
        expr.map(|expr| self.bind(expr, markers).map(Box::new))
            .transpose()
    }

    fn bind_subquery(
        &self,
        subquery: &SubquerySegment,
        markers: &mut ParameterMarkerCollector,
    ) -> BindResult<SubquerySegment> {
        let outer = self.outer.push(self.registry);
        let select = SelectStatementBinder::correlated(self.context, &outer).bind(&subquery.select)?;
        markers.extend(&select.attributes.parameter_markers);
        Ok(SubquerySegment {
            span: subquery.span,
            select: Box::new(select),
        })
    }

    /// Bind a single column reference
    ///
    /// # Errors
    ///
    /// - `UnknownColumn` if no layer exposes the column (strict mode only)
    /// - `AmbiguousColumn` if the first matching layer exposes it twice
    pub fn bind_column(&self, column: &ColumnSegment) -> BindResult<ColumnSegment> {
        match self.resolve_column(column) {
            Ok(bound) => Ok(column.clone().with_bound(bound)),
            Err(BindError::UnknownColumn { .. }) if self.passes_through_unknown() => {
                debug!(column = %column.qualified(), "Leaving clause column unbound");
                Ok(column.clone())
            }
            Err(e) => Err(e),
        }
    }

    fn passes_through_unknown(&self) -> bool {
        self.lenient && !self.context.config().strict_clause_binding
    }

    fn resolve_column(&self, column: &ColumnSegment) -> BindResult<ColumnBoundInfo> {
        if column.owner.is_none() {
            if self.context.is_variable(&column.name) {
                return Ok(ColumnBoundInfo::variable(&column.name));
            }
            if self.aliases_first {
                if let Some(bound) = self.find_alias(&column.name) {
                    return Ok(bound);
                }
            }
        }

        let owner = column.owner.as_deref();
        let layers = [self.registry, self.context.external_scopes()]
            .into_iter()
            .chain(self.outer.iter());
        for layer in layers {
            if let Some(found) = layer.find_column(owner, &column.name, column.span)? {
                let bound = found.column.bound.clone().unwrap_or_else(|| {
                    ColumnBoundInfo::new(
                        self.context.database(),
                        "",
                        found.column.owner.as_deref().unwrap_or_default(),
                        &found.column.name,
                    )
                    .with_source(ColumnSource::Subquery)
                });
                return Ok(bound);
            }
        }

        if column.owner.is_none() && !self.aliases_first {
            if let Some(bound) = self.find_alias(&column.name) {
                return Ok(bound);
            }
        }

        Err(BindError::UnknownColumn {
            name: column.qualified(),
            span: column.span,
        })
    }

    /// Match an unqualified name against SELECT-list aliases
    fn find_alias(&self, name: &str) -> Option<ColumnBoundInfo> {
        self.aliases.iter().find_map(|projection| match projection {
            Projection::Column(p) if p.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(name)) => {
                p.column.bound.clone()
            }
            Projection::Expression(p) if p.alias.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(name)) => {
                Some(
                    ColumnBoundInfo::new(self.context.database(), "", "", name)
                        .with_source(ColumnSource::Expression)
                        .with_data_type(infer_data_type(&p.expr)),
                )
            }
            _ => None,
        })
    }
}

/// Type of a bound expression, when it can be derived
pub(crate) fn infer_data_type(expr: &Expr) -> Option<DataType> {
    match expr {
        Expr::Column(column) => column.bound.as_ref().and_then(|b| b.data_type.clone()),
        Expr::Literal { value, .. } => match value {
            Literal::Integer(_) => Some(DataType::BigInt),
            Literal::Float(_) => Some(DataType::Double),
            Literal::String(_) => Some(DataType::Varchar(None)),
            Literal::Boolean(_) => Some(DataType::Boolean),
            _ => None,
        },
        Expr::ParameterMarker(marker) => marker.bound.as_ref().and_then(|b| b.data_type.clone()),
        Expr::BinaryOp {
            left, op, right, ..
        } => match op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                promote(infer_data_type(left), infer_data_type(right))
            }
            BinaryOp::Concat => Some(DataType::Varchar(None)),
            _ => Some(DataType::Boolean),
        },
        Expr::UnaryOp { op, expr, .. } => match op {
            UnaryOp::Neg => infer_data_type(expr),
            _ => Some(DataType::Boolean),
        },
        Expr::Function { name, args, .. } => infer_function_type(name, args),
        Expr::Case {
            results,
            else_result,
            ..
        } => results
            .iter()
            .chain(else_result.as_deref())
            .find_map(infer_data_type),
        Expr::Cast { type_name, .. } => {
            let Ok(data_type) = type_name.parse::<DataType>();
            Some(data_type)
        }
        Expr::Between { .. }
        | Expr::InList { .. }
        | Expr::InSubquery { .. }
        | Expr::Exists { .. } => Some(DataType::Boolean),
        Expr::Subquery(subquery) => subquery
            .select
            .projections
            .projections
            .first()
            .and_then(|projection| match projection {
                Projection::Column(p) => p.column.bound.as_ref().and_then(|b| b.data_type.clone()),
                Projection::Expression(p) => infer_data_type(&p.expr),
                Projection::Shorthand(_) => None,
            }),
        Expr::Paren(inner) => infer_data_type(inner),
        Expr::List(items) => items.first().and_then(infer_data_type),
    }
}

fn infer_function_type(name: &str, args: &[Expr]) -> Option<DataType> {
    match name.to_ascii_lowercase().as_str() {
        "count" => Some(DataType::BigInt),
        "avg" => Some(DataType::Decimal),
        "sum" | "min" | "max" | "abs" | "coalesce" | "ifnull" | "nvl" => {
            args.first().and_then(infer_data_type)
        }
        "upper" | "lower" | "trim" | "substring" | "concat" => Some(DataType::Varchar(None)),
        "now" | "current_timestamp" => Some(DataType::Timestamp),
        "current_date" => Some(DataType::Date),
        _ => None,
    }
}

fn promote(left: Option<DataType>, right: Option<DataType>) -> Option<DataType> {
    match (left, right) {
        (Some(DataType::Double), _) | (_, Some(DataType::Double)) => Some(DataType::Double),
        (Some(DataType::Float), _) | (_, Some(DataType::Float)) => Some(DataType::Float),
        (Some(DataType::Decimal), _) | (_, Some(DataType::Decimal)) => Some(DataType::Decimal),
        (Some(DataType::BigInt), _) | (_, Some(DataType::BigInt)) => Some(DataType::BigInt),
        (Some(left), Some(right)) if left == right => Some(left),
        (Some(only), None) | (None, Some(only)) => Some(only),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BinderConfig;
    use crate::segment::fixtures::{context_metadata, order_registry};
    use sql_binder_ir::{
        ColumnProjection, Dialect, ExpressionProjection, ParameterMarker, SelectStatement, Span,
    };

    fn col(start: usize, owner: Option<&str>, name: &str) -> ColumnSegment {
        let column = ColumnSegment::new(Span::new(start, start + name.len() - 1), name);
        match owner {
            Some(owner) => column.with_owner(owner),
            None => column,
        }
    }

    #[test]
    fn test_bind_column_from_registry() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "o");
        let outer = OuterScopes::empty();
        let binder = ExpressionBinder::new(&context, &registry, &outer);

        let bound = binder.bind_column(&col(7, Some("o"), "status")).unwrap();
        let info = bound.bound.unwrap();
        assert_eq!(info.table, "t_order");
        assert_eq!(info.column, "status");
        assert_eq!(info.data_type, Some(DataType::Varchar(Some(32))));
    }

    #[test]
    fn test_unknown_owner_reports_qualified_name() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "o");
        let outer = OuterScopes::empty();
        let binder = ExpressionBinder::new(&context, &registry, &outer);

        let result = binder.bind_column(&col(40, Some("c"), "y"));
        assert_eq!(
            result,
            Err(BindError::UnknownColumn {
                name: "c.y".to_string(),
                span: Span::new(40, 40),
            })
        );
    }

    #[test]
    fn test_variable_is_not_looked_up() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::SQLServer)
            .with_variable_names(["@status"]);
        let registry = TableScopeRegistry::new();
        let outer = OuterScopes::empty();
        let binder = ExpressionBinder::new(&context, &registry, &outer);

        let bound = binder.bind_column(&col(30, None, "@Status")).unwrap();
        assert_eq!(bound.bound.unwrap().source, ColumnSource::Variable);
    }

    #[test]
    fn test_bind_collects_markers_and_keeps_structure() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "t_order");
        let outer = OuterScopes::empty();
        let binder = ExpressionBinder::new(&context, &registry, &outer);

        let expr = Expr::binary(
            Expr::column(col(30, None, "order_id")),
            BinaryOp::Eq,
            Expr::ParameterMarker(ParameterMarker::new(Span::new(41, 41), 0)),
        );
        let mut markers = ParameterMarkerCollector::new();
        let bound = binder.bind(&expr, &mut markers).unwrap();

        assert_eq!(bound.span(), expr.span());
        assert_eq!(markers.len(), 1);
        let mut columns = Vec::new();
        bound.visit_columns(&mut |c| columns.push(c.clone()));
        assert!(columns[0].is_bound());
    }

    #[test]
    fn test_lenient_passes_unknown_through() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "o");
        let outer = OuterScopes::empty();
        let binder = ExpressionBinder::new(&context, &registry, &outer).lenient(&[]);

        let bound = binder.bind_column(&col(60, None, "missing")).unwrap();
        assert!(!bound.is_bound());

        let config = BinderConfig::new().with_strict_clause_binding(true);
        let strict_context = context.clone().with_config(&config);
        let strict = ExpressionBinder::new(&strict_context, &registry, &outer).lenient(&[]);
        assert!(matches!(
            strict.bind_column(&col(60, None, "missing")),
            Err(BindError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_lenient_matches_projection_alias() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let registry = order_registry(&context, "o");
        let outer = OuterScopes::empty();
        let strict = ExpressionBinder::new(&context, &registry, &outer);

        let projections = vec![
            Projection::Column(
                ColumnProjection::new(strict.bind_column(&col(7, Some("o"), "user_id")).unwrap())
                    .with_alias("uid"),
            ),
            Projection::Expression(
                ExpressionProjection::new(Expr::Function {
                    span: Span::new(20, 27),
                    name: "COUNT".to_string(),
                    args: vec![],
                    distinct: false,
                })
                .with_alias("cnt"),
            ),
        ];
        let binder = strict.lenient(&projections);

        let uid = binder.bind_column(&col(70, None, "UID")).unwrap().bound.unwrap();
        assert_eq!(uid.column, "user_id");

        let cnt = binder.bind_column(&col(80, None, "cnt")).unwrap().bound.unwrap();
        assert_eq!(cnt.source, ColumnSource::Expression);
        assert_eq!(cnt.data_type, Some(DataType::BigInt));
    }

    #[test]
    fn test_outer_scope_is_consulted_last() {
        let metadata = context_metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);
        let outer_registry = order_registry(&context, "a");
        let root = OuterScopes::empty();
        let outer = root.push(&outer_registry);
        let inner_registry = TableScopeRegistry::new();
        let binder = ExpressionBinder::new(&context, &inner_registry, &outer);

        let bound = binder.bind_column(&col(50, Some("a"), "order_id")).unwrap();
        assert_eq!(bound.bound.unwrap().table, "t_order");

        let isolated = ExpressionBinder::new(&context, &inner_registry, &root);
        assert!(isolated.bind_column(&col(50, Some("a"), "order_id")).is_err());
    }

    #[test]
    fn test_infer_data_type() {
        assert_eq!(
            infer_data_type(&Expr::Cast {
                span: Span::default(),
                expr: Box::new(Expr::literal(Span::default(), Literal::String("1".into()))),
                type_name: "DECIMAL(10,2)".to_string(),
            }),
            Some(DataType::Decimal)
        );
        assert_eq!(
            infer_data_type(&Expr::binary(
                Expr::literal(Span::new(7, 7), Literal::Integer(1)),
                BinaryOp::Add,
                Expr::literal(Span::new(11, 13), Literal::Float(1.5)),
            )),
            Some(DataType::Double)
        );
        assert_eq!(
            infer_data_type(&Expr::Subquery(SubquerySegment::new(
                Span::default(),
                SelectStatement::default()
            ))),
            None
        );
    }
}
