// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Binder - Statement Trees
//!
//! This crate provides the tree model shared by the parser front-end, the
//! binder, and every later stage (rewriting, execution planning).
//!
//! The same types describe a statement before and after binding:
//! - **Unbound**: produced by a parser, every `bound` field is `None`
//! - **Bound**: produced by the binder, column and table leaves carry
//!   [`ColumnBoundInfo`] / [`TableBoundInfo`] describing where they come from
//!
//! All segments carry a [`Span`] with the source offsets they were parsed from.
//! Parameter markers are ordered by those offsets.

pub mod bound;
pub mod dialect;
pub mod expr;
pub mod metadata;
pub mod segment;
pub mod span;
pub mod statement;

// Re-export commonly used types
pub use bound::{ColumnBoundInfo, ColumnSource, TableBoundInfo};
pub use dialect::{Dialect, DialectExtensions, DialectFamily};
pub use expr::{
    BinaryOp, ColumnSegment, Expr, Literal, ParameterMarker, ParameterMarkerKind, SubquerySegment,
    UnaryOp,
};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
pub use segment::{
    ColumnAssignment, ColumnProjection, CombineSegment, CombineType, CommentSegment,
    CommonTableExpr, ExpressionProjection, GroupBySegment, HavingSegment, InsertColumnsSegment,
    InsertValuesSegment, JoinTableSegment, JoinType, LimitSegment, LockSegment, LockStrength,
    OrderByItem, OrderBySegment, OutputSegment, Projection, ProjectionsSegment,
    SetAssignmentSegment, ShorthandProjection, SimpleTableSegment, SortDirection,
    SubqueryTableSegment, TableName, TableSegment, WhereSegment, WindowItem, WindowSegment,
    WithSegment,
};
pub use span::Span;
pub use statement::{
    DeleteStatement, InsertStatement, MergeStatement, SelectStatement, SqlStatement,
    StatementAttributes, UpdateStatement,
};
