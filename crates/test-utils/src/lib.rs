// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Testing utilities for sql-binder
//!
//! This crate provides common testing components including:
//! - A mock catalog with a standard sharding schema
//! - Builders for unbound statement trees
//! - Assertions over bound columns and parameter markers

pub mod assertions;
pub mod fixtures;
pub mod mock_catalog;

// Re-exports for convenience
pub use assertions::BindAssertions;
pub use mock_catalog::{MockCatalog, MockCatalogBuilder, STANDARD_DATABASE, standard_metadata};

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber honoring `RUST_LOG`. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
