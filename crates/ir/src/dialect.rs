// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! Every statement carries the dialect it was parsed with. The binder never
//! interprets dialect-specific syntax itself; it only asks a dialect whether a
//! scoping feature is available (see [`Dialect::supports`]).
//!
//! ## Dialect Families
//!
//! - **MySQL Family**: MySQL, MariaDB
//! - **PostgreSQL Family**: PostgreSQL, openGauss
//! - **Oracle Family**: Oracle
//! - **SQL Server Family**: SQL Server
//!
//! ## Dialect Extensions
//!
//! - `LateralDerivedTable`: a derived table marked `LATERAL` may reference
//!   tables declared before it in the same `FROM`
//! - `Merge`: `MERGE INTO ... USING ...`
//! - `OutputClause`: SQL Server `OUTPUT` on DML statements
//! - `Returning`: `RETURNING` on DML statements
//! - `OnDuplicateKeyUpdate`: MySQL upsert syntax
//! - `LockOfTables`: `FOR UPDATE OF t1, t2`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Dialect {
    #[default]
    MySQL,
    MariaDB,
    PostgreSQL,
    OpenGauss,
    Oracle,
    SQLServer,
}

impl Dialect {
    /// Returns the family this dialect belongs to
    pub fn family(&self) -> DialectFamily {
        match self {
            Dialect::MySQL | Dialect::MariaDB => DialectFamily::MySQL,
            Dialect::PostgreSQL | Dialect::OpenGauss => DialectFamily::PostgreSQL,
            Dialect::Oracle => DialectFamily::Oracle,
            Dialect::SQLServer => DialectFamily::SQLServer,
        }
    }

    /// Check if this dialect supports a specific extension
    pub fn supports(&self, ext: DialectExtensions) -> bool {
        match ext {
            DialectExtensions::LateralDerivedTable => matches!(
                self.family(),
                DialectFamily::MySQL | DialectFamily::PostgreSQL | DialectFamily::Oracle
            ),
            DialectExtensions::Merge => matches!(
                self,
                Dialect::Oracle | Dialect::SQLServer | Dialect::OpenGauss | Dialect::PostgreSQL
            ),
            DialectExtensions::OutputClause => self.family() == DialectFamily::SQLServer,
            DialectExtensions::Returning => matches!(
                self,
                Dialect::PostgreSQL | Dialect::OpenGauss | Dialect::Oracle | Dialect::MariaDB
            ),
            DialectExtensions::OnDuplicateKeyUpdate => self.family() == DialectFamily::MySQL,
            DialectExtensions::LockOfTables => {
                matches!(self.family(), DialectFamily::PostgreSQL | DialectFamily::Oracle)
            }
        }
    }

    /// Parse a dialect name as it appears in configuration files
    pub fn from_name(name: &str) -> Option<Dialect> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" => Some(Dialect::MySQL),
            "mariadb" => Some(Dialect::MariaDB),
            "postgresql" | "postgres" => Some(Dialect::PostgreSQL),
            "opengauss" => Some(Dialect::OpenGauss),
            "oracle" => Some(Dialect::Oracle),
            "sqlserver" | "mssql" => Some(Dialect::SQLServer),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::MySQL => "MySQL",
            Dialect::MariaDB => "MariaDB",
            Dialect::PostgreSQL => "PostgreSQL",
            Dialect::OpenGauss => "openGauss",
            Dialect::Oracle => "Oracle",
            Dialect::SQLServer => "SQLServer",
        };
        f.write_str(name)
    }
}

/// Dialect family groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectFamily {
    MySQL,
    PostgreSQL,
    Oracle,
    SQLServer,
}

/// Dialect-specific features that influence binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DialectExtensions {
    /// `LATERAL (subquery)` may correlate with preceding FROM items
    LateralDerivedTable,

    /// `MERGE INTO target USING source ON ...`
    Merge,

    /// SQL Server `OUTPUT inserted.*`
    OutputClause,

    /// `RETURNING ...`
    Returning,

    /// MySQL `ON DUPLICATE KEY UPDATE`
    OnDuplicateKeyUpdate,

    /// `FOR UPDATE OF t1, t2`
    LockOfTables,
}
