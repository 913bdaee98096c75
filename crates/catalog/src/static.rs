// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static Catalog
//!
//! A catalog backed by schema definitions held in memory, typically read from
//! a YAML file.
//!
//! ## YAML format
//!
//! ```yaml
//! tables:
//!   - name: t_order
//!     schema: public
//!     columns:
//!       - { name: order_id, type: bigint, primary_key: true }
//!       - { name: user_id, type: int }
//!       - { name: status, type: "varchar(50)", nullable: true }
//!       - { name: row_version, type: int, visible: false }
//! ```
//!
//! Column types are written as in DDL and parsed with [`DataType::from_str`].

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
use crate::{Catalog, CatalogError, CatalogResult};

fn default_schema() -> String {
    "public".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    tables: Vec<TableDef>,
}

#[derive(Debug, Deserialize)]
struct TableDef {
    name: String,
    #[serde(default = "default_schema")]
    schema: String,
    #[serde(default)]
    table_type: TableType,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    columns: Vec<ColumnDef>,
}

#[derive(Debug, Deserialize)]
struct ColumnDef {
    name: String,
    #[serde(rename = "type")]
    data_type: String,
    #[serde(default)]
    nullable: bool,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    comment: Option<String>,
}

impl From<ColumnDef> for ColumnMetadata {
    fn from(def: ColumnDef) -> Self {
        let Ok(data_type) = DataType::from_str(&def.data_type);
        ColumnMetadata {
            name: def.name,
            data_type,
            nullable: def.nullable,
            visible: def.visible,
            is_primary_key: def.primary_key,
            comment: def.comment,
        }
    }
}

/// Catalog with predefined schema data
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    /// Keyed by lower-cased table name, in definition order
    tables: IndexMap<String, TableMetadata>,
}

impl StaticCatalog {
    /// Create an empty static catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a table, replacing any table of the same name
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.insert(table.name.to_ascii_lowercase(), table);
        self
    }

    /// Create a catalog from table definitions
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ConfigurationError` if two tables share a name.
    pub fn from_tables(tables: impl IntoIterator<Item = TableMetadata>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for table in tables {
            let key = table.name.to_ascii_lowercase();
            if catalog.tables.contains_key(&key) {
                return Err(CatalogError::ConfigurationError(format!(
                    "table '{}' is defined more than once",
                    table.name
                )));
            }
            catalog.tables.insert(key, table);
        }
        Ok(catalog)
    }

    /// Parse schema definitions from YAML
    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let file: SchemaFile = serde_yaml::from_str(yaml)
            .map_err(|e| CatalogError::SerializationError(e.to_string()))?;

        let tables = file.tables.into_iter().map(|def| {
            let mut table = TableMetadata::new(def.name, def.schema)
                .with_type(def.table_type)
                .with_columns(def.columns.into_iter().map(ColumnMetadata::from).collect());
            table.comment = def.comment;
            table
        });
        Self::from_tables(tables)
    }

    /// Load schema definitions from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::SerializationError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self.tables.values().cloned().collect())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        self.tables
            .get(&table.to_ascii_lowercase())
            .map(|t| t.columns.clone())
            .ok_or_else(|| CatalogError::TableNotFound(table.to_string(), default_schema()))
    }
}
