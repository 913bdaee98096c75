// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Bound metadata
//!
//! Metadata the binder attaches to leaves of a statement tree. A bound column
//! records the physical column it ultimately reads from, even when it is
//! referenced through a derived table or CTE, so later stages (rewriting,
//! routing, parameter binding) never re-resolve it.

use serde::{Deserialize, Serialize};

use crate::metadata::{DataType, TableType};

/// Where a bound column's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnSource {
    /// A catalog table or view
    Table,
    /// The output of a derived table (`FROM (SELECT ...) AS t`)
    Subquery,
    /// The output of a common table expression
    Cte,
    /// A computed projection with no single physical origin
    Expression,
    /// A declared variable, not a column at all
    Variable,
}

/// Origin of a bound column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnBoundInfo {
    /// Database the column originates from
    pub database: String,
    /// Schema inside that database
    pub schema: String,
    /// Originating table name (not alias)
    pub table: String,
    /// Originating column name
    pub column: String,
    /// Column type, when it can be derived
    pub data_type: Option<DataType>,
    pub source: ColumnSource,
}

impl ColumnBoundInfo {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
            data_type: None,
            source: ColumnSource::Table,
        }
    }

    /// Bound info for a reference to a declared variable
    pub fn variable(name: impl Into<String>) -> Self {
        Self {
            database: String::new(),
            schema: String::new(),
            table: String::new(),
            column: name.into(),
            data_type: None,
            source: ColumnSource::Variable,
        }
    }

    pub fn with_data_type(mut self, data_type: Option<DataType>) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_source(mut self, source: ColumnSource) -> Self {
        self.source = source;
        self
    }

    /// `database.table.column`
    pub fn qualified(&self) -> String {
        format!("{}.{}.{}", self.database, self.table, self.column)
    }
}

/// Origin of a bound simple table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableBoundInfo {
    pub database: String,
    pub schema: String,
    pub table_type: TableType,
}

impl TableBoundInfo {
    pub fn new(database: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table_type: TableType::Table,
        }
    }

    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }
}
