// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! Tables and columns as the catalog describes them. The binder copies the
//! relevant parts of these into [`ColumnBoundInfo`](crate::ColumnBoundInfo) so
//! that a bound tree never has to consult the catalog again.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    // Numeric types
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    Double,

    // String types
    Char(Option<usize>),
    Varchar(Option<usize>),
    Text,

    // Binary types
    Binary,
    VarBinary(Option<usize>),
    Blob,

    // Date/Time types
    Date,
    Time,
    DateTime,
    Timestamp,

    Boolean,
    Json,
    Uuid,

    // Unknown/Other (with original type name)
    Other(String),
}

impl DataType {
    /// Extract a length from a type string (e.g., "varchar(255)" -> Some(255))
    fn extract_length(type_str: &str) -> Option<usize> {
        let open = type_str.find('(')?;
        let close = type_str[open..].find(')')?;
        type_str[open + 1..open + close].trim().parse().ok()
    }
}

impl FromStr for DataType {
    type Err = std::convert::Infallible;

    /// Parse a column type as written in DDL (e.g., "varchar(64)", "int", "numeric(10,2)").
    ///
    /// Unrecognised names become [`DataType::Other`].
    fn from_str(type_name: &str) -> Result<Self, Self::Err> {
        let type_lower = type_name.trim().to_lowercase();
        let base: String = type_lower
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();

        Ok(match base.as_str() {
            "tinyint" => DataType::TinyInt,
            "smallint" | "int2" => DataType::SmallInt,
            "int" | "integer" | "int4" => DataType::Integer,
            "bigint" | "int8" => DataType::BigInt,
            "decimal" | "numeric" | "number" => DataType::Decimal,
            "float" | "real" | "float4" => DataType::Float,
            "double" | "float8" => DataType::Double,
            "char" | "nchar" => DataType::Char(Self::extract_length(&type_lower)),
            "varchar" | "varchar2" | "nvarchar" | "nvarchar2" => {
                DataType::Varchar(Self::extract_length(&type_lower))
            }
            "text" | "tinytext" | "mediumtext" | "longtext" | "clob" => DataType::Text,
            "binary" => DataType::Binary,
            "varbinary" => DataType::VarBinary(Self::extract_length(&type_lower)),
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "bytea" => DataType::Blob,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "datetime" | "datetime2" => DataType::DateTime,
            "timestamp" | "timestamptz" => DataType::Timestamp,
            "bool" | "boolean" | "bit" => DataType::Boolean,
            "json" | "jsonb" => DataType::Json,
            "uuid" | "uniqueidentifier" => DataType::Uuid,
            _ => DataType::Other(type_name.trim().to_string()),
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::TinyInt => f.write_str("TINYINT"),
            DataType::SmallInt => f.write_str("SMALLINT"),
            DataType::Integer => f.write_str("INTEGER"),
            DataType::BigInt => f.write_str("BIGINT"),
            DataType::Decimal => f.write_str("DECIMAL"),
            DataType::Float => f.write_str("FLOAT"),
            DataType::Double => f.write_str("DOUBLE"),
            DataType::Char(Some(len)) => write!(f, "CHAR({len})"),
            DataType::Char(None) => f.write_str("CHAR"),
            DataType::Varchar(Some(len)) => write!(f, "VARCHAR({len})"),
            DataType::Varchar(None) => f.write_str("VARCHAR"),
            DataType::Text => f.write_str("TEXT"),
            DataType::Binary => f.write_str("BINARY"),
            DataType::VarBinary(Some(len)) => write!(f, "VARBINARY({len})"),
            DataType::VarBinary(None) => f.write_str("VARBINARY"),
            DataType::Blob => f.write_str("BLOB"),
            DataType::Date => f.write_str("DATE"),
            DataType::Time => f.write_str("TIME"),
            DataType::DateTime => f.write_str("DATETIME"),
            DataType::Timestamp => f.write_str("TIMESTAMP"),
            DataType::Boolean => f.write_str("BOOLEAN"),
            DataType::Json => f.write_str("JSON"),
            DataType::Uuid => f.write_str("UUID"),
            DataType::Other(name) => f.write_str(name),
        }
    }
}

/// Table type classification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TableType {
    #[default]
    Table,
    View,
    MaterializedView,
    Temporary,
    System,
}

fn default_visible() -> bool {
    true
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,
    /// Whether the column is returned by `*` and used as a default insert column.
    /// Invisible columns (Oracle `INVISIBLE`, MySQL `INVISIBLE`) can still be
    /// referenced by name.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Whether this is a primary key column
    #[serde(default)]
    pub is_primary_key: bool,
    /// Column comment/description
    #[serde(default)]
    pub comment: Option<String>,
}

impl ColumnMetadata {
    /// Create a new column metadata with builder pattern
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            visible: true,
            is_primary_key: false,
            comment: None,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: mark as invisible
    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Builder method: mark as primary key
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Schema name inside the database (e.g., "public", "dbo")
    pub schema: String,
    /// Column definitions in declaration order
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Table comment/description
    #[serde(default)]
    pub comment: Option<String>,
    /// Table type (TABLE, VIEW, MATERIALIZED VIEW, etc.)
    #[serde(default)]
    pub table_type: TableType,
}

impl TableMetadata {
    /// Create new table metadata with builder pattern
    pub fn new(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
            comment: None,
            table_type: TableType::Table,
        }
    }

    /// Builder method: add columns
    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Builder method: set table type
    pub fn with_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Get column by name, ignoring ASCII case
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Columns returned by `*`, in declaration order
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnMetadata> {
        self.columns.iter().filter(|c| c.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_type() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!(
            "VARCHAR(64)".parse::<DataType>().unwrap(),
            DataType::Varchar(Some(64))
        );
        assert_eq!("numeric(10,2)".parse::<DataType>().unwrap(), DataType::Decimal);
        assert_eq!(
            "geometry".parse::<DataType>().unwrap(),
            DataType::Other("geometry".to_string())
        );
    }

    #[test]
    fn test_data_type_display() {
        assert_eq!(DataType::Varchar(Some(20)).to_string(), "VARCHAR(20)");
        assert_eq!(DataType::BigInt.to_string(), "BIGINT");
    }

    #[test]
    fn test_visible_columns() {
        let table = TableMetadata::new("t_order", "public").with_columns(vec![
            ColumnMetadata::new("order_id", DataType::BigInt).with_primary_key(),
            ColumnMetadata::new("row_version", DataType::Integer).invisible(),
            ColumnMetadata::new("status", DataType::Varchar(Some(20))),
        ]);

        let visible: Vec<&str> = table.visible_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(visible, vec!["order_id", "status"]);
        assert!(table.get_column("ROW_VERSION").is_some());
    }

    #[test]
    fn test_column_metadata_deserialize_defaults() {
        let column: ColumnMetadata =
            serde_json::from_str(r#"{"name": "id", "data_type": "Integer"}"#).unwrap();
        assert!(column.visible);
        assert!(!column.nullable);
    }
}
