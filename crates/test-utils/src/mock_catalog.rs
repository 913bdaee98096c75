// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock catalog implementation for testing
//!
//! Provides an in-memory catalog with builder pattern for easy test setup

use sql_binder_catalog::{
    Catalog, CatalogError, CatalogResult, ColumnMetadata, DataType, DatabaseMetaData, MetaData,
    TableMetadata, TableType,
};

/// Database name the standard schema is registered under
pub const STANDARD_DATABASE: &str = "sharding_db";

/// In-memory mock catalog for testing
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    tables: Vec<TableMetadata>,
}

impl MockCatalog {
    /// Create a new empty mock catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing one with the same name
    pub fn add_table(mut self, table: TableMetadata) -> Self {
        self.tables.retain(|t| !t.name.eq_ignore_ascii_case(&table.name));
        self.tables.push(table);
        self
    }

    /// Get a table by name, ignoring case
    pub fn get_table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Snapshot the catalog as database `name` without going through a runtime
    pub fn to_database(&self, name: &str) -> DatabaseMetaData {
        self.tables
            .iter()
            .cloned()
            .fold(DatabaseMetaData::new(name), DatabaseMetaData::with_table)
    }
}

#[async_trait::async_trait]
impl Catalog for MockCatalog {
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
        Ok(self.tables.clone())
    }

    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
        match self.get_table(table) {
            Some(table) => Ok(table.columns.clone()),
            None => Err(CatalogError::TableNotFound(table.to_string(), "mock".to_string())),
        }
    }
}

/// Builder for creating mock catalogs with a fluent API
#[derive(Debug, Default)]
pub struct MockCatalogBuilder {
    catalog: MockCatalog,
}

impl MockCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard sharding schema: `t_order`, `t_order_item`, `t_user`
    /// and the `v_order_status` view.
    ///
    /// `t_user.password` is invisible, so wildcards and default insert
    /// columns skip it.
    pub fn with_standard_schema(mut self) -> Self {
        self.catalog = self
            .catalog
            .add_table(TableMetadata::new("t_order", "public").with_columns(vec![
                ColumnMetadata::new("order_id", DataType::BigInt)
                    .with_nullable(false)
                    .with_primary_key(),
                ColumnMetadata::new("user_id", DataType::Integer).with_nullable(false),
                ColumnMetadata::new("status", DataType::Varchar(Some(32))),
                ColumnMetadata::new("merchant_id", DataType::Integer),
            ]))
            .add_table(TableMetadata::new("t_order_item", "public").with_columns(vec![
                ColumnMetadata::new("item_id", DataType::BigInt)
                    .with_nullable(false)
                    .with_primary_key(),
                ColumnMetadata::new("order_id", DataType::BigInt).with_nullable(false),
                ColumnMetadata::new("user_id", DataType::Integer),
                ColumnMetadata::new("price", DataType::Decimal),
            ]))
            .add_table(
                TableMetadata::new("t_user", "public")
                    .with_columns(vec![
                        ColumnMetadata::new("user_id", DataType::Integer)
                            .with_nullable(false)
                            .with_primary_key(),
                        ColumnMetadata::new("user_name", DataType::Varchar(Some(64))),
                        ColumnMetadata::new("password", DataType::Varchar(Some(64))).invisible(),
                    ])
                    .with_comment("User accounts"),
            )
            .add_table(
                TableMetadata::new("v_order_status", "public")
                    .with_columns(vec![
                        ColumnMetadata::new("order_id", DataType::BigInt),
                        ColumnMetadata::new("status", DataType::Varchar(Some(32))),
                    ])
                    .with_type(TableType::View),
            );
        self
    }

    /// Add a custom table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.catalog = self.catalog.add_table(table);
        self
    }

    /// Build the mock catalog
    pub fn build(self) -> MockCatalog {
        self.catalog
    }

    /// Build a snapshot holding the catalog as [`STANDARD_DATABASE`]
    pub fn build_metadata(self) -> MetaData {
        MetaData::builder()
            .with_database(self.catalog.to_database(STANDARD_DATABASE))
            .build()
    }
}

/// Snapshot of the standard schema under [`STANDARD_DATABASE`]
pub fn standard_metadata() -> MetaData {
    MockCatalogBuilder::new().with_standard_schema().build_metadata()
}
