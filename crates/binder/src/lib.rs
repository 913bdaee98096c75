// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # SQL Binder
//!
//! This crate resolves a parsed, unbound statement tree against a read-only
//! metadata snapshot and returns a new, bound tree.
//!
//! ## Overview
//!
//! Binding attaches origin metadata to every leaf that names a schema object:
//! - **Tables**: database, schema and table type
//! - **Columns**: originating database/table/column, type, and whether the
//!   value comes from a table, derived table, CTE, expression or variable
//! - **Parameter markers**: the column slot each marker fills, when known
//!
//! The input tree is never modified, and every bind call owns its own
//! scopes, so one [`MetaData`](sql_binder_catalog::MetaData) snapshot can be
//! shared by any number of concurrent binds.
//!
//! ## Scoping
//!
//! Column references are resolved against, in order:
//! 1. the statement's own FROM / target tables
//! 2. external scopes: CTEs, and the MERGE source seen from its branches
//! 3. the tables of enclosing statements, for correlated subqueries
//!
//! The first layer that knows the name wins; two tables of one layer
//! exposing it make the reference ambiguous.
//!
//! ## Example
//!
//! ```rust
//! use sql_binder::StatementBinderEngine;
//! use sql_binder_catalog::{ColumnMetadata, DataType, DatabaseMetaData, MetaData, TableMetadata};
//! use sql_binder_ir::{
//!     ColumnSegment, Dialect, Projection, ProjectionsSegment, SelectStatement,
//!     SimpleTableSegment, Span, SqlStatement,
//! };
//!
//! let metadata = MetaData::builder()
//!     .with_database(DatabaseMetaData::new("sharding_db").with_table(
//!         TableMetadata::new("t_order", "public").with_columns(vec![
//!             ColumnMetadata::new("order_id", DataType::BigInt),
//!             ColumnMetadata::new("status", DataType::Varchar(Some(32))),
//!         ]),
//!     ))
//!     .build();
//!
//! // SELECT status FROM t_order
//! let statement = SqlStatement::Select(
//!     SelectStatement::new(Dialect::MySQL)
//!         .with_projections(ProjectionsSegment::new(
//!             Span::new(7, 12),
//!             vec![Projection::column(ColumnSegment::new(Span::new(7, 12), "status"))],
//!         ))
//!         .with_from(SimpleTableSegment::new(Span::new(19, 25), "t_order")),
//! );
//!
//! let engine = StatementBinderEngine::default();
//! let bound = engine.bind(&statement, &metadata, Some("sharding_db")).unwrap();
//!
//! let SqlStatement::Select(select) = bound else { unreachable!() };
//! let Projection::Column(status) = &select.projections.projections[0] else { unreachable!() };
//! assert_eq!(status.column.bound.as_ref().unwrap().qualified(), "sharding_db.t_order.status");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod scope;
pub mod segment;
pub mod statement;

// Re-export commonly used types
pub use config::{BinderConfig, ConfigError};
pub use context::BinderContext;
pub use error::{BindError, BindResult};
pub use scope::{OuterScopes, ScopeKey, TableScope, TableScopeRegistry, TableScopeSource};
pub use segment::{
    ExpressionBinder, ParameterMarkerCollector, ProjectionsSegmentBinder, TableSegmentBinder,
};
pub use statement::{
    DeleteStatementBinder, InsertStatementBinder, MergeStatementBinder, SelectStatementBinder,
    StatementBinderEngine, UpdateStatementBinder,
};
