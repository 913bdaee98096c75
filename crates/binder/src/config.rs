// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Binder Configuration
//!
//! Knobs that change how lenient the binder is. Every field has a default, so
//! an empty document is a valid configuration.
//!
//! ## Example
//!
//! ```yaml
//! defaultDatabase: sharding_db
//! strictClauseBinding: true
//! lateralDerivedTables: false
//! ```
//!
//! The same keys are accepted from JSON, either at the top level or nested
//! under `"sqlBinder"`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Binder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BinderConfig {
    /// Database used when the caller does not name one
    pub default_database: Option<String>,

    /// Fail on unresolvable GROUP BY / HAVING / ORDER BY / WINDOW columns
    /// instead of passing them through unbound
    pub strict_clause_binding: bool,

    /// Override the dialect's support for `LATERAL` derived tables
    pub lateral_derived_tables: Option<bool>,
}

/// Configuration used by contexts built without an explicit one
pub(crate) static DEFAULT_CONFIG: BinderConfig = BinderConfig {
    default_database: None,
    strict_clause_binding: false,
    lateral_derived_tables: None,
};

impl BinderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_database(mut self, database: impl Into<String>) -> Self {
        self.default_database = Some(database.into());
        self
    }

    pub fn with_strict_clause_binding(mut self, strict: bool) -> Self {
        self.strict_clause_binding = strict;
        self
    }

    pub fn with_lateral_derived_tables(mut self, enabled: bool) -> Self {
        self.lateral_derived_tables = Some(enabled);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(database) = &self.default_database {
            if database.trim().is_empty() {
                return Err(ConfigError::InvalidDefaultDatabase {
                    reason: "must not be empty".to_string(),
                });
            }
            if database.contains('.') {
                return Err(ConfigError::InvalidDefaultDatabase {
                    reason: format!("'{}' must be a bare database name", database),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a configuration from a JSON settings payload.
    ///
    /// Expected shape, with every key optional:
    /// {
    ///   "sqlBinder": {
    ///     "defaultDatabase": "...",
    ///     "strictClauseBinding": false,
    ///     "lateralDerivedTables": null
    ///   }
    /// }
    pub fn from_json(settings: &Value) -> Result<Self, ConfigError> {
        let section = settings.get("sqlBinder").unwrap_or(settings);
        let config: Self = serde_json::from_value(section.clone())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid default database: {reason}")]
    InvalidDefaultDatabase { reason: String },

    #[error("Invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
