// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statements
//!
//! The statement kinds the binder understands, in a single sum type
//! ([`SqlStatement`]). Each statement carries [`StatementAttributes`] that are
//! not part of its syntax: dialect, declared variables, comments, and the
//! ordered list of parameter markers.
//!
//! ## Examples
//!
//! ```sql
//! -- SelectStatement
//! WITH recent AS (SELECT * FROM t_order WHERE created_at > ?)
//! SELECT r.order_id, i.item_id FROM recent r JOIN t_order_item i USING (order_id)
//!
//! -- DeleteStatement
//! DELETE FROM t_order WHERE user_id = ? ORDER BY order_id LIMIT 10
//!
//! -- MergeStatement
//! MERGE INTO t_order t USING t_order_staging s ON t.order_id = s.order_id
//! WHEN MATCHED THEN UPDATE SET t.status = s.status
//! WHEN NOT MATCHED THEN INSERT (order_id, status) VALUES (s.order_id, ?)
//! ```

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::expr::{Expr, ParameterMarker, SubquerySegment};
use crate::segment::{
    CombineSegment, CommentSegment, GroupBySegment, HavingSegment, InsertColumnsSegment,
    InsertValuesSegment, LimitSegment, LockSegment, OrderBySegment, OutputSegment,
    ProjectionsSegment, SetAssignmentSegment, SimpleTableSegment, TableSegment, WhereSegment,
    WindowSegment, WithSegment,
};

/// Statement-level data that is not part of the syntax tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementAttributes {
    pub dialect: Dialect,
    /// Variables declared by the enclosing routine (e.g., `DECLARE @id INT`)
    pub variable_names: Vec<String>,
    /// Parameter markers in source order. Recomputed by the binder.
    pub parameter_markers: Vec<ParameterMarker>,
    pub comments: Vec<CommentSegment>,
}

impl StatementAttributes {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    pub fn with_variable_names(mut self, names: Vec<String>) -> Self {
        self.variable_names = names;
        self
    }

    pub fn with_comments(mut self, comments: Vec<CommentSegment>) -> Self {
        self.comments = comments;
        self
    }
}

/// SELECT statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub attributes: StatementAttributes,
    pub with: Option<WithSegment>,
    pub projections: ProjectionsSegment,
    pub from: Option<TableSegment>,
    pub where_clause: Option<WhereSegment>,
    pub group_by: Option<GroupBySegment>,
    pub having: Option<HavingSegment>,
    pub order_by: Option<OrderBySegment>,
    /// `left UNION right` and friends. A combined select without its own
    /// projections returns the columns of `left`.
    pub combine: Option<CombineSegment>,
    pub limit: Option<LimitSegment>,
    pub lock: Option<LockSegment>,
    pub window: Option<WindowSegment>,
}

impl SelectStatement {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            attributes: StatementAttributes::new(dialect),
            ..Default::default()
        }
    }

    pub fn with_projections(mut self, projections: ProjectionsSegment) -> Self {
        self.projections = projections;
        self
    }

    pub fn with_from(mut self, from: impl Into<TableSegment>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_where(mut self, where_clause: WhereSegment) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_with(mut self, with: WithSegment) -> Self {
        self.with = Some(with);
        self
    }

    pub fn with_combine(mut self, combine: CombineSegment) -> Self {
        self.combine = Some(combine);
        self
    }

    pub fn with_lock(mut self, lock: LockSegment) -> Self {
        self.lock = Some(lock);
        self
    }
}

/// INSERT statement.
///
/// As the INSERT branch of a MERGE, `table` is `None` and the merge target is
/// written to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub attributes: StatementAttributes,
    pub table: Option<SimpleTableSegment>,
    pub columns: Option<InsertColumnsSegment>,
    pub values: Vec<InsertValuesSegment>,
    /// `INSERT ... SELECT`
    pub select: Option<SubquerySegment>,
    /// MySQL `ON DUPLICATE KEY UPDATE`
    pub on_duplicate_key_update: Option<SetAssignmentSegment>,
    /// `WHEN NOT MATCHED THEN INSERT ... WHERE` (Oracle MERGE)
    pub where_clause: Option<WhereSegment>,
}

impl InsertStatement {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            attributes: StatementAttributes::new(dialect),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: SimpleTableSegment) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_columns(mut self, columns: InsertColumnsSegment) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_values(mut self, values: Vec<InsertValuesSegment>) -> Self {
        self.values = values;
        self
    }
}

/// UPDATE statement.
///
/// As the UPDATE branch of a MERGE, `table` is `None` and the merge target is
/// written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub attributes: StatementAttributes,
    pub table: Option<TableSegment>,
    pub set: SetAssignmentSegment,
    pub where_clause: Option<WhereSegment>,
    /// `WHEN MATCHED THEN UPDATE ... DELETE WHERE` (Oracle MERGE)
    pub delete_where: Option<WhereSegment>,
    pub order_by: Option<OrderBySegment>,
    pub limit: Option<LimitSegment>,
    pub with: Option<WithSegment>,
}

impl UpdateStatement {
    pub fn new(dialect: Dialect, set: SetAssignmentSegment) -> Self {
        Self {
            attributes: StatementAttributes::new(dialect),
            table: None,
            set,
            where_clause: None,
            delete_where: None,
            order_by: None,
            limit: None,
            with: None,
        }
    }

    pub fn with_table(mut self, table: impl Into<TableSegment>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_where(mut self, where_clause: WhereSegment) -> Self {
        self.where_clause = Some(where_clause);
        self
    }
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub attributes: StatementAttributes,
    pub table: TableSegment,
    pub where_clause: Option<WhereSegment>,
    pub order_by: Option<OrderBySegment>,
    pub limit: Option<LimitSegment>,
    pub with: Option<WithSegment>,
    pub output: Option<OutputSegment>,
}

impl DeleteStatement {
    pub fn new(dialect: Dialect, table: impl Into<TableSegment>) -> Self {
        Self {
            attributes: StatementAttributes::new(dialect),
            table: table.into(),
            where_clause: None,
            order_by: None,
            limit: None,
            with: None,
            output: None,
        }
    }

    pub fn with_where(mut self, where_clause: WhereSegment) -> Self {
        self.where_clause = Some(where_clause);
        self
    }
}

/// MERGE statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeStatement {
    pub attributes: StatementAttributes,
    pub target: TableSegment,
    pub source: TableSegment,
    /// `ON` expression
    pub on: Option<Expr>,
    /// `WHEN NOT MATCHED THEN INSERT ...`
    pub insert: Option<InsertStatement>,
    /// `WHEN MATCHED THEN UPDATE ...`
    pub update: Option<UpdateStatement>,
}

impl MergeStatement {
    pub fn new(
        dialect: Dialect,
        target: impl Into<TableSegment>,
        source: impl Into<TableSegment>,
    ) -> Self {
        Self {
            attributes: StatementAttributes::new(dialect),
            target: target.into(),
            source: source.into(),
            on: None,
            insert: None,
            update: None,
        }
    }

    pub fn with_on(mut self, on: Expr) -> Self {
        self.on = Some(on);
        self
    }

    pub fn with_insert(mut self, insert: InsertStatement) -> Self {
        self.insert = Some(insert);
        self
    }

    pub fn with_update(mut self, update: UpdateStatement) -> Self {
        self.update = Some(update);
        self
    }
}

/// Any bindable statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlStatement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Merge(MergeStatement),
}

impl SqlStatement {
    pub fn attributes(&self) -> &StatementAttributes {
        match self {
            SqlStatement::Select(statement) => &statement.attributes,
            SqlStatement::Insert(statement) => &statement.attributes,
            SqlStatement::Update(statement) => &statement.attributes,
            SqlStatement::Delete(statement) => &statement.attributes,
            SqlStatement::Merge(statement) => &statement.attributes,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SqlStatement::Select(_) => "SELECT",
            SqlStatement::Insert(_) => "INSERT",
            SqlStatement::Update(_) => "UPDATE",
            SqlStatement::Delete(_) => "DELETE",
            SqlStatement::Merge(_) => "MERGE",
        }
    }

    pub fn parameter_markers(&self) -> &[ParameterMarker] {
        &self.attributes().parameter_markers
    }
}
