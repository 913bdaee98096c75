// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Error types for statement binding
//!
//! Every resolution failure aborts the whole bind call. Each variant carries
//! the offending identifier and the [`Span`] it was written at.
//!
//! Segments the binder declines to resolve are not errors: they are passed
//! through unbound and logged at `debug`.

use sql_binder_ir::Span;
use thiserror::Error;

/// Result type alias for binding operations
pub type BindResult<T> = Result<T, BindError>;

/// Errors that can occur while binding a statement
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Qualified table names a database the metadata does not contain
    #[error("Unknown database '{name}' at {span}")]
    UnknownDatabase { name: String, span: Span },

    /// Table not found in the database, or `owner.*` with an unknown owner
    #[error("Table '{name}' does not exist at {span}")]
    UnknownTable { name: String, span: Span },

    /// Two tables registered under the same name in one scope
    #[error("Duplicate table alias '{alias}' at {span}")]
    DuplicateTableAlias { alias: String, span: Span },

    /// Column not found in any visible table
    #[error("Unknown column '{name}' at {span}")]
    UnknownColumn { name: String, span: Span },

    /// Column reference is ambiguous (found in multiple tables of one scope)
    #[error("Column '{name}' at {span} is ambiguous (found in {candidates:?})")]
    AmbiguousColumn {
        name: String,
        span: Span,
        candidates: Vec<String>,
    },

    /// CTE column list does not match its query's output
    #[error("CTE '{cte}' defines {defined} columns but query returns {returned} columns")]
    CteColumnCountMismatch {
        cte: String,
        defined: usize,
        returned: usize,
        span: Span,
    },

    /// Neither the caller nor the configuration named a database
    #[error("No database selected")]
    NoDatabaseSelected,
}

impl BindError {
    /// The identifier the error is about, if any
    pub fn identifier(&self) -> Option<&str> {
        match self {
            BindError::UnknownDatabase { name, .. }
            | BindError::UnknownTable { name, .. }
            | BindError::UnknownColumn { name, .. }
            | BindError::AmbiguousColumn { name, .. } => Some(name),
            BindError::DuplicateTableAlias { alias, .. } => Some(alias),
            BindError::CteColumnCountMismatch { cte, .. } => Some(cte),
            BindError::NoDatabaseSelected => None,
        }
    }

    /// Where the offending identifier was written
    pub fn span(&self) -> Option<Span> {
        match self {
            BindError::UnknownDatabase { span, .. }
            | BindError::UnknownTable { span, .. }
            | BindError::DuplicateTableAlias { span, .. }
            | BindError::UnknownColumn { span, .. }
            | BindError::AmbiguousColumn { span, .. }
            | BindError::CteColumnCountMismatch { span, .. } => Some(*span),
            BindError::NoDatabaseSelected => None,
        }
    }
}
