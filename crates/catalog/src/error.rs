// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for Catalog operations
//!
//! This module defines the error types used throughout the catalog layer.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading schema information
#[derive(Debug, Error, Clone, Serialize)]
pub enum CatalogError {
    /// Schema query failed in the underlying source
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Requested table was not found
    #[error("Table '{0}' not found in schema '{1}'")]
    TableNotFound(String, String),

    /// Failed to read or parse schema definitions
    #[error("Failed to deserialize schema data: {0}")]
    SerializationError(String),

    /// Schema definitions are well-formed but inconsistent
    #[error("Invalid catalog configuration: {0}")]
    ConfigurationError(String),
}
