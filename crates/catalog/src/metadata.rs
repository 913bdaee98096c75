// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Metadata types for database schema information
//!
//! This module re-exports metadata types from the `sql-binder-ir` crate so that
//! catalog implementors only need to depend on this crate.

pub use sql_binder_ir::{ColumnMetadata, DataType, TableMetadata, TableType};
