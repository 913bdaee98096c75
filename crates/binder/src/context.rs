// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Binder context
//!
//! Per-bind state: the metadata snapshot, the current database, the dialect,
//! declared variables, configuration, and the external scopes visible to the
//! statement being bound.
//!
//! A context is created for every bind invocation, including every nested
//! one (CTE, subquery, MERGE branch). A nested context starts as a copy of
//! its parent; external scopes are only ever added to it.

use sql_binder_catalog::{MetaData, TableMetadata};
use sql_binder_ir::{Dialect, DialectExtensions, Span};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{BinderConfig, DEFAULT_CONFIG};
use crate::error::{BindError, BindResult};
use crate::scope::{TableScope, TableScopeRegistry};

/// State shared by every segment binder of one statement
#[derive(Debug, Clone)]
pub struct BinderContext<'a> {
    metadata: &'a MetaData,
    database: String,
    dialect: Dialect,
    variable_names: Arc<HashSet<String>>,
    external_scopes: TableScopeRegistry,
    config: &'a BinderConfig,
}

impl<'a> BinderContext<'a> {
    pub fn new(metadata: &'a MetaData, database: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            metadata,
            database: database.into(),
            dialect,
            variable_names: Arc::new(HashSet::new()),
            external_scopes: TableScopeRegistry::new(),
            config: &DEFAULT_CONFIG,
        }
    }

    pub fn with_config(mut self, config: &'a BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Declared variable names, matched ignoring ASCII case
    pub fn with_variable_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.variable_names = Arc::new(
            names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        );
        self
    }

    /// A copy of this context that also sees every scope of `scopes`.
    ///
    /// A scope named like an existing external scope hides it.
    pub fn with_external_scopes(&self, scopes: &TableScopeRegistry) -> Self {
        let mut context = self.clone();
        for scope in scopes.iter() {
            context.external_scopes.shadow(scope.clone());
        }
        context
    }

    /// Make one more scope visible to the rest of this statement
    pub(crate) fn add_external_scope(&mut self, scope: TableScope) {
        self.external_scopes.shadow(scope);
    }

    pub fn metadata(&self) -> &'a MetaData {
        self.metadata
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn config(&self) -> &'a BinderConfig {
        self.config
    }

    pub fn external_scopes(&self) -> &TableScopeRegistry {
        &self.external_scopes
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.variable_names.contains(&name.to_ascii_lowercase())
    }

    /// Whether a `LATERAL` derived table may see the tables before it
    pub fn lateral_derived_tables(&self) -> bool {
        self.config
            .lateral_derived_tables
            .unwrap_or_else(|| self.dialect.supports(DialectExtensions::LateralDerivedTable))
    }

    /// Resolve `database.table`, falling back to the current database.
    ///
    /// Returns the database name as the metadata spells it.
    pub(crate) fn resolve_table(
        &self,
        database: Option<&str>,
        table: &str,
        span: Span,
    ) -> BindResult<(&'a str, &'a TableMetadata)> {
        let database_name = database.unwrap_or(self.database.as_str());
        let database = self
            .metadata
            .database(database_name)
            .ok_or_else(|| BindError::UnknownDatabase {
                name: database_name.to_string(),
                span,
            })?;
        let table = database
            .table(table)
            .ok_or_else(|| BindError::UnknownTable {
                name: table.to_string(),
                span,
            })?;
        Ok((database.name(), table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::TableScopeSource;
    use sql_binder_catalog::{DatabaseMetaData, TableMetadata};

    fn metadata() -> MetaData {
        MetaData::builder()
            .with_database(
                DatabaseMetaData::new("Sharding_DB")
                    .with_table(TableMetadata::new("t_order", "public")),
            )
            .build()
    }

    #[test]
    fn test_resolve_table() {
        let metadata = metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::MySQL);

        let (database, table) = context.resolve_table(None, "T_ORDER", Span::default()).unwrap();
        assert_eq!(database, "Sharding_DB");
        assert_eq!(table.name, "t_order");

        let unknown_table = context.resolve_table(None, "t_user", Span::new(14, 19));
        assert!(matches!(unknown_table, Err(BindError::UnknownTable { .. })));

        let unknown_db = context.resolve_table(Some("other"), "t_order", Span::new(14, 19));
        assert!(matches!(unknown_db, Err(BindError::UnknownDatabase { .. })));
    }

    #[test]
    fn test_variables_ignore_case() {
        let metadata = metadata();
        let context = BinderContext::new(&metadata, "sharding_db", Dialect::SQLServer)
            .with_variable_names(["@UserId"]);
        assert!(context.is_variable("@userid"));
        assert!(!context.is_variable("user_id"));
    }

    #[test]
    fn test_external_scopes_are_copied() {
        let metadata = metadata();
        let parent = BinderContext::new(&metadata, "sharding_db", Dialect::Oracle);
        let mut source = TableScopeRegistry::new();
        source.shadow(TableScope::new("s", TableScopeSource::Subquery));

        let child = parent.with_external_scopes(&source);
        assert!(child.external_scopes().contains("s"));
        assert!(parent.external_scopes().is_empty());
    }

    #[test]
    fn test_lateral_follows_dialect_unless_configured() {
        let metadata = metadata();
        assert!(BinderContext::new(&metadata, "db", Dialect::PostgreSQL).lateral_derived_tables());
        assert!(!BinderContext::new(&metadata, "db", Dialect::SQLServer).lateral_derived_tables());

        let config = BinderConfig::new().with_lateral_derived_tables(false);
        let context = BinderContext::new(&metadata, "db", Dialect::PostgreSQL).with_config(&config);
        assert!(!context.lateral_derived_tables());
    }
}
