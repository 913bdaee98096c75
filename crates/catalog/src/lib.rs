// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL Binder - Catalog Layer
//!
//! This crate provides the schema information the binder resolves against.
//!
//! ## Architecture
//!
//! Loading and binding are separate phases:
//!
//! 1. **Load** (async): one [`Catalog`] per database is queried for its
//!    tables and columns, producing a [`MetaData`] snapshot
//! 2. **Bind** (sync): any number of bind calls read the snapshot concurrently
//!
//! ## Catalogs
//!
//! - [`StaticCatalog`]: schema definitions from YAML or built in code
//! - Custom: implement [`Catalog`] for a live connection or a cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sql_binder_catalog::{MetaData, StaticCatalog};
//!
//! let catalog = StaticCatalog::from_file("schema.yaml")?;
//! let metadata = MetaData::builder()
//!     .load_database("sharding_db", &catalog)
//!     .await?
//!     .build();
//! ```
//!
//! ## Implementing the Catalog Trait
//!
//! ```rust,ignore
//! use sql_binder_catalog::{Catalog, CatalogResult, ColumnMetadata, TableMetadata};
//! use async_trait::async_trait;
//!
//! struct MyCatalog;
//!
//! #[async_trait]
//! impl Catalog for MyCatalog {
//!     async fn list_tables(&self) -> CatalogResult<Vec<TableMetadata>> {
//!         // Your implementation here
//!     }
//!
//!     async fn get_columns(&self, table: &str) -> CatalogResult<Vec<ColumnMetadata>> {
//!         // Your implementation here
//!     }
//! }
//! ```

pub mod error;
pub mod metadata;
pub mod snapshot;
pub mod r#static;
pub mod r#trait;

// Re-exports
pub use error::{CatalogError, CatalogResult};
pub use metadata::{ColumnMetadata, DataType, TableMetadata, TableType};
pub use snapshot::{DatabaseMetaData, MetaData, MetaDataBuilder};
pub use r#static::StaticCatalog;
pub use r#trait::Catalog;
