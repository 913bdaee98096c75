// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata snapshot
//!
//! [`MetaData`] is the read-only view of every database the binder may see.
//! It is loaded once, asynchronously, from [`Catalog`] implementations and
//! then shared by reference (or behind an `Arc`) across any number of
//! concurrent bind calls. Nothing in this module mutates a built snapshot.
//!
//! ```rust,ignore
//! let metadata = MetaData::builder()
//!     .load_database("sharding_db", &catalog)
//!     .await?
//!     .build();
//! assert!(metadata.contains_table("sharding_db", "t_order"));
//! ```
//!
//! Database and table names are matched ignoring ASCII case.

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

use crate::metadata::TableMetadata;
use crate::{Catalog, CatalogError, CatalogResult};

/// Tables of one database
#[derive(Debug, Clone, Default)]
pub struct DatabaseMetaData {
    name: String,
    tables: IndexMap<String, TableMetadata>,
}

impl DatabaseMetaData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    /// Builder method: add a table
    pub fn with_table(mut self, table: TableMetadata) -> Self {
        self.tables.insert(table.name.to_ascii_lowercase(), table);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.get(&name.to_ascii_lowercase())
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(&name.to_ascii_lowercase())
    }

    /// Tables in load order
    pub fn tables(&self) -> impl Iterator<Item = &TableMetadata> {
        self.tables.values()
    }
}

/// Read-only snapshot of all databases
#[derive(Debug, Clone, Default)]
pub struct MetaData {
    databases: HashMap<String, DatabaseMetaData>,
}

impl MetaData {
    pub fn builder() -> MetaDataBuilder {
        MetaDataBuilder::default()
    }

    pub fn database(&self, name: &str) -> Option<&DatabaseMetaData> {
        self.databases.get(&name.to_ascii_lowercase())
    }

    pub fn contains_database(&self, name: &str) -> bool {
        self.databases.contains_key(&name.to_ascii_lowercase())
    }

    /// Look up a table in a database
    pub fn table(&self, database: &str, table: &str) -> Option<&TableMetadata> {
        self.database(database).and_then(|db| db.table(table))
    }

    pub fn contains_table(&self, database: &str, table: &str) -> bool {
        self.table(database, table).is_some()
    }

    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.databases.values().map(DatabaseMetaData::name)
    }
}

/// Builder for [`MetaData`]
#[derive(Debug, Default)]
pub struct MetaDataBuilder {
    databases: HashMap<String, DatabaseMetaData>,
}

impl MetaDataBuilder {
    /// Add an already-built database, replacing one of the same name
    pub fn with_database(mut self, database: DatabaseMetaData) -> Self {
        self.databases.insert(database.name.to_ascii_lowercase(), database);
        self
    }

    /// Load every table of `catalog` as database `name`.
    ///
    /// Tables listed without columns are completed with
    /// [`Catalog::get_columns`].
    ///
    /// # Errors
    ///
    /// Propagates catalog failures. Returns `CatalogError::ConfigurationError`
    /// if a database of the same name was already loaded.
    pub async fn load_database(
        mut self,
        name: impl Into<String>,
        catalog: &dyn Catalog,
    ) -> CatalogResult<Self> {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.databases.contains_key(&key) {
            return Err(CatalogError::ConfigurationError(format!(
                "database '{}' loaded twice",
                name
            )));
        }

        let mut database = DatabaseMetaData::new(name);
        for mut table in catalog.list_tables().await? {
            if table.columns.is_empty() {
                table.columns = catalog.get_columns(&table.name).await?;
            }
            database = database.with_table(table);
        }
        debug!(
            database = %database.name,
            tables = database.tables.len(),
            "Loaded database metadata"
        );

        self.databases.insert(key, database);
        Ok(self)
    }

    pub fn build(self) -> MetaData {
        MetaData {
            databases: self.databases,
        }
    }
}
