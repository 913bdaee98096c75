// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Segments
//!
//! Clause-level nodes of a statement tree.
//!
//! ## Table Segments
//!
//! [`TableSegment`] is what appears in `FROM`, as a DML target, or as a MERGE
//! source:
//!
//! - `Simple`: `db.t_order AS o`
//! - `Subquery`: `(SELECT ...) AS d`, optionally `LATERAL`
//! - `Join`: `a JOIN b ON ...`, `a JOIN b USING (id)`, `a NATURAL JOIN b`
//!
//! ```sql
//! FROM t_order o
//!   JOIN t_order_item i ON o.order_id = i.order_id
//!   JOIN LATERAL (SELECT max(price) AS p FROM t_price WHERE t_price.item_id = i.item_id) m
//! ```
//!
//! ## Projections
//!
//! [`Projection`] is one item of a SELECT list. A shorthand (`*`, `t.*`)
//! never survives binding: it is expanded into one column projection per
//! visible column of the referenced scope(s).
//!
//! ## Pass-through Segments
//!
//! LIMIT, OUTPUT and comments are carried into the bound tree as-is.

use serde::{Deserialize, Serialize};

use crate::bound::TableBoundInfo;
use crate::expr::{ColumnSegment, Expr, SubquerySegment};
use crate::span::Span;

/// Possibly database-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName {
    /// Database qualifier (`db` in `db.t`)
    pub owner: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            owner: None,
            name: name.into(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// A catalog table reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleTableSegment {
    pub span: Span,
    pub name: TableName,
    pub alias: Option<String>,
    /// Filled in by the binder
    pub bound: Option<TableBoundInfo>,
}

impl SimpleTableSegment {
    pub fn new(span: Span, name: impl Into<String>) -> Self {
        Self {
            span,
            name: TableName::new(name),
            alias: None,
            bound: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.name.owner = Some(owner.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Identifier the table is addressed by in the rest of the statement
    pub fn alias_or_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name.name)
    }
}

/// A derived table: `(SELECT ...) [AS] alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryTableSegment {
    pub span: Span,
    pub subquery: SubquerySegment,
    pub alias: Option<String>,
    /// `LATERAL (SELECT ...)`
    pub lateral: bool,
}

impl SubqueryTableSegment {
    pub fn new(span: Span, subquery: SubquerySegment) -> Self {
        Self {
            span,
            subquery,
            alias: None,
            lateral: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn lateral(mut self) -> Self {
        self.lateral = true;
        self
    }
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// `left JOIN right [ON condition | USING (columns)]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinTableSegment {
    pub span: Span,
    pub left: Box<TableSegment>,
    pub right: Box<TableSegment>,
    pub join_type: JoinType,
    pub natural: bool,
    /// ON expression
    pub condition: Option<Expr>,
    /// USING columns
    pub using: Vec<ColumnSegment>,
}

impl JoinTableSegment {
    pub fn new(span: Span, left: TableSegment, right: TableSegment) -> Self {
        Self {
            span,
            left: Box::new(left),
            right: Box::new(right),
            join_type: JoinType::Inner,
            natural: false,
            condition: None,
            using: Vec::new(),
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub fn with_condition(mut self, condition: Expr) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_using(mut self, using: Vec<ColumnSegment>) -> Self {
        self.using = using;
        self
    }

    pub fn natural(mut self) -> Self {
        self.natural = true;
        self
    }
}

/// A table reference of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSegment {
    Simple(SimpleTableSegment),
    Subquery(SubqueryTableSegment),
    Join(JoinTableSegment),
}

impl TableSegment {
    pub fn span(&self) -> Span {
        match self {
            TableSegment::Simple(table) => table.span,
            TableSegment::Subquery(table) => table.span,
            TableSegment::Join(join) => join.span,
        }
    }
}

impl From<SimpleTableSegment> for TableSegment {
    fn from(table: SimpleTableSegment) -> Self {
        TableSegment::Simple(table)
    }
}

impl From<SubqueryTableSegment> for TableSegment {
    fn from(table: SubqueryTableSegment) -> Self {
        TableSegment::Subquery(table)
    }
}

impl From<JoinTableSegment> for TableSegment {
    fn from(join: JoinTableSegment) -> Self {
        TableSegment::Join(join)
    }
}

/// A projected column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnProjection {
    pub column: ColumnSegment,
    pub alias: Option<String>,
    /// Whether `*` and default insert column lists include this column
    pub visible: bool,
}

impl ColumnProjection {
    pub fn new(column: ColumnSegment) -> Self {
        Self {
            column,
            alias: None,
            visible: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Name this projection is exposed as to an enclosing query
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column.name)
    }
}

/// A projected computed expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionProjection {
    pub span: Span,
    pub expr: Expr,
    pub alias: Option<String>,
}

impl ExpressionProjection {
    pub fn new(expr: Expr) -> Self {
        Self {
            span: expr.span(),
            expr,
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// `*` or `owner.*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShorthandProjection {
    pub span: Span,
    pub owner: Option<String>,
}

/// Item in a SELECT projection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    Column(ColumnProjection),
    Expression(ExpressionProjection),
    Shorthand(ShorthandProjection),
}

impl Projection {
    /// Shorthand for an unaliased column projection
    pub fn column(column: ColumnSegment) -> Self {
        Projection::Column(ColumnProjection::new(column))
    }

    /// Shorthand for `*`
    pub fn wildcard(span: Span) -> Self {
        Projection::Shorthand(ShorthandProjection { span, owner: None })
    }

    /// Shorthand for `owner.*`
    pub fn qualified_wildcard(span: Span, owner: impl Into<String>) -> Self {
        Projection::Shorthand(ShorthandProjection {
            span,
            owner: Some(owner.into()),
        })
    }

    pub fn span(&self) -> Span {
        match self {
            Projection::Column(projection) => projection.column.span,
            Projection::Expression(projection) => projection.span,
            Projection::Shorthand(projection) => projection.span,
        }
    }
}

/// SELECT list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionsSegment {
    pub span: Span,
    pub distinct: bool,
    pub projections: Vec<Projection>,
}

impl ProjectionsSegment {
    pub fn new(span: Span, projections: Vec<Projection>) -> Self {
        Self {
            span,
            distinct: false,
            projections,
        }
    }
}

/// `WHERE expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereSegment {
    pub span: Span,
    pub expr: Expr,
}

impl WhereSegment {
    pub fn new(span: Span, expr: Expr) -> Self {
        Self { span, expr }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY / GROUP BY item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: SortDirection,
}

impl OrderByItem {
    pub fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(mut self) -> Self {
        self.direction = SortDirection::Desc;
        self
    }
}

/// `GROUP BY items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBySegment {
    pub span: Span,
    pub items: Vec<OrderByItem>,
}

/// `HAVING expr`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingSegment {
    pub span: Span,
    pub expr: Expr,
}

/// `ORDER BY items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBySegment {
    pub span: Span,
    pub items: Vec<OrderByItem>,
}

/// `LIMIT row_count [OFFSET offset]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSegment {
    pub span: Span,
    pub row_count: Option<Expr>,
    pub offset: Option<Expr>,
}

/// Locking strength of a `FOR ...` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LockStrength {
    #[default]
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

/// `FOR UPDATE [OF t1, t2 | OF t.col]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockSegment {
    pub span: Span,
    pub strength: LockStrength,
    /// `OF t1, t2` (PostgreSQL)
    pub tables: Vec<SimpleTableSegment>,
    /// `OF t.col` (Oracle)
    pub columns: Vec<ColumnSegment>,
}

impl LockSegment {
    pub fn new(span: Span, strength: LockStrength) -> Self {
        Self {
            span,
            strength,
            tables: Vec::new(),
            columns: Vec::new(),
        }
    }
}

/// One named window definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowItem {
    pub name: String,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByItem>,
}

/// `WINDOW w AS (...), ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSegment {
    pub span: Span,
    pub items: Vec<WindowItem>,
}

/// SQL Server `OUTPUT deleted.col, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSegment {
    pub span: Span,
    pub columns: Vec<ColumnSegment>,
}

/// A comment attached to a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentSegment {
    pub span: Span,
    pub text: String,
}

/// One common table expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub span: Span,
    pub name: String,
    /// Optional column alias list: `name (a, b) AS (...)`
    pub columns: Vec<String>,
    pub subquery: SubquerySegment,
}

impl CommonTableExpr {
    pub fn new(span: Span, name: impl Into<String>, subquery: SubquerySegment) -> Self {
        Self {
            span,
            name: name.into(),
            columns: Vec::new(),
            subquery,
        }
    }

    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }
}

/// `WITH [RECURSIVE] cte, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithSegment {
    pub span: Span,
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpr>,
}

impl WithSegment {
    pub fn new(span: Span, ctes: Vec<CommonTableExpr>) -> Self {
        Self {
            span,
            recursive: false,
            ctes,
        }
    }
}

/// Set operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombineType {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
    Minus,
}

/// `left UNION [ALL] right` and friends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineSegment {
    pub span: Span,
    pub left: SubquerySegment,
    pub combine_type: CombineType,
    pub right: SubquerySegment,
}

/// `INSERT INTO t (a, b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertColumnsSegment {
    pub span: Span,
    pub columns: Vec<ColumnSegment>,
}

/// One row of `VALUES (...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertValuesSegment {
    pub span: Span,
    pub values: Vec<Expr>,
}

/// `col = value` or `(a, b) = value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub span: Span,
    pub columns: Vec<ColumnSegment>,
    pub value: Expr,
}

impl ColumnAssignment {
    pub fn new(column: ColumnSegment, value: Expr) -> Self {
        Self {
            span: column.span.cover(value.span()),
            columns: vec![column],
            value,
        }
    }
}

/// `SET assignments` / `ON DUPLICATE KEY UPDATE assignments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetAssignmentSegment {
    pub span: Span,
    pub assignments: Vec<ColumnAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_or_name() {
        let table = SimpleTableSegment::new(Span::new(14, 20), "t_order");
        assert_eq!(table.alias_or_name(), "t_order");

        let aliased = table.with_alias("o");
        assert_eq!(aliased.alias_or_name(), "o");
    }

    #[test]
    fn test_output_name() {
        let projection = ColumnProjection::new(ColumnSegment::new(Span::new(7, 14), "user_id"));
        assert_eq!(projection.output_name(), "user_id");
        assert_eq!(projection.with_alias("uid").output_name(), "uid");
    }
}
