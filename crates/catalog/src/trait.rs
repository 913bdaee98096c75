// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Catalog trait for database schema abstraction
//!
//! This module defines the async Catalog trait that schema sources implement.
//! The binder never talks to a catalog directly: a [`MetaData`](crate::MetaData)
//! snapshot is loaded from one or more catalogs first, then shared read-only.

use crate::error::CatalogResult;
use crate::metadata::{ColumnMetadata, TableMetadata};

/// Catalog trait for database schema abstraction
///
/// One implementation describes one database. Implementations can read from
/// static files, live connections, or caches.
///
/// # Examples
///
/// ```rust,ignore
/// use sql_binder_catalog::{Catalog, CatalogError};
///
/// async fn table_names(catalog: &impl Catalog) -> Result<Vec<String>, CatalogError> {
///     let tables = catalog.list_tables().await?;
///     Ok(tables.into_iter().map(|t| t.name).collect())
/// }
/// ```
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// List all tables in the database
    ///
    /// Tables may be returned with an empty column list; the snapshot loader
    /// then asks [`Catalog::get_columns`] for them.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::QueryFailed` if the underlying source fails.
    async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>>;

    /// Get column metadata for a specific table, in declaration order
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TableNotFound` if the table doesn't exist.
    async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>>;
}
