// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Table scopes
//!
//! A [`TableScope`] is what one bound table exposes to the rest of its
//! statement: the columns it produces, already bound to their origin.
//!
//! Scopes are kept in layers:
//!
//! - a [`TableScopeRegistry`] per statement (its `FROM`, DML target, or MERGE
//!   source/target), keyed by alias or table name ignoring case
//! - the context's external scopes (CTEs, MERGE source seen from its
//!   INSERT/UPDATE branches)
//! - [`OuterScopes`], the registries of enclosing statements, nearest first
//!
//! Column lookup walks the layers in that order and stops at the first layer
//! with a match.

use indexmap::IndexMap;
use sql_binder_ir::{ColumnProjection, Span, TableBoundInfo};
use std::fmt;
use tracing::trace;

use crate::error::{BindError, BindResult};

/// Identifier compared ignoring ASCII case
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(String);

impl ScopeKey {
    pub fn new(identifier: &str) -> Self {
        Self(identifier.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a scope was built from
#[derive(Debug, Clone, PartialEq)]
pub enum TableScopeSource {
    /// A catalog table
    Table { table: String, bound: TableBoundInfo },
    /// A derived table
    Subquery,
    /// A common table expression of the given name
    Cte(String),
}

/// Columns exposed by one bound table
#[derive(Debug, Clone, PartialEq)]
pub struct TableScope {
    /// Alias or table name with its original casing
    pub name: String,
    pub source: TableScopeSource,
    /// Output columns in declaration order, owned by `name`
    pub columns: Vec<ColumnProjection>,
}

impl TableScope {
    pub fn new(name: impl Into<String>, source: TableScopeSource) -> Self {
        Self {
            name: name.into(),
            source,
            columns: Vec::new(),
        }
    }

    pub fn with_columns(mut self, columns: Vec<ColumnProjection>) -> Self {
        self.columns = columns;
        self
    }

    /// Find an output column by name, ignoring ASCII case
    pub fn find_column(&self, name: &str) -> Option<&ColumnProjection> {
        self.columns
            .iter()
            .find(|c| c.output_name().eq_ignore_ascii_case(name))
    }

    /// Columns returned by `*`
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnProjection> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// The same scope exposed under another name, every column re-owned
    pub fn renamed(&self, name: &str, source: TableScopeSource) -> TableScope {
        let columns = self
            .columns
            .iter()
            .map(|projection| {
                let mut column = projection.column.clone();
                column.owner = Some(name.to_string());
                column.name = projection.output_name().to_string();
                ColumnProjection::new(column).with_visible(projection.visible)
            })
            .collect();
        TableScope {
            name: name.to_string(),
            source,
            columns,
        }
    }
}

/// Case-insensitive, registration-ordered map of table scopes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableScopeRegistry {
    scopes: IndexMap<ScopeKey, TableScope>,
}

impl TableScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scope
    ///
    /// # Errors
    ///
    /// Returns `BindError::DuplicateTableAlias` if a scope with the same name
    /// (ignoring case) is already registered.
    pub fn register(&mut self, scope: TableScope, span: Span) -> BindResult<()> {
        let key = ScopeKey::new(&scope.name);
        if self.scopes.contains_key(&key) {
            return Err(BindError::DuplicateTableAlias {
                alias: scope.name,
                span,
            });
        }
        trace!(scope = %key, columns = scope.columns.len(), "Registered table scope");
        self.scopes.insert(key, scope);
        Ok(())
    }

    /// Register or replace a scope. A replaced scope keeps its position.
    pub fn shadow(&mut self, scope: TableScope) {
        self.scopes.insert(ScopeKey::new(&scope.name), scope);
    }

    /// Register every scope of `other`, failing on the first duplicate
    pub fn register_all(&mut self, other: &TableScopeRegistry, span: Span) -> BindResult<()> {
        for scope in other.iter() {
            self.register(scope.clone(), span)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableScope> {
        self.scopes.get(&ScopeKey::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.contains_key(&ScopeKey::new(name))
    }

    /// Scopes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TableScope> {
        self.scopes.values()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Look a column up in this layer only.
    ///
    /// Returns `Ok(None)` when this layer has nothing to say about the
    /// reference: the owner is not registered here, or no scope has the
    /// column.
    ///
    /// # Errors
    ///
    /// - `UnknownColumn` if `owner` is registered here but lacks the column
    /// - `AmbiguousColumn` if an unqualified name is exposed by several scopes
    pub fn find_column(
        &self,
        owner: Option<&str>,
        name: &str,
        span: Span,
    ) -> BindResult<Option<&ColumnProjection>> {
        if let Some(owner) = owner {
            let Some(scope) = self.get(owner) else {
                return Ok(None);
            };
            return scope
                .find_column(name)
                .map(Some)
                .ok_or_else(|| BindError::UnknownColumn {
                    name: format!("{}.{}", owner, name),
                    span,
                });
        }

        let mut found = self
            .iter()
            .filter_map(|scope| scope.find_column(name).map(|column| (scope, column)));
        let Some((first_scope, first)) = found.next() else {
            return Ok(None);
        };
        let others: Vec<String> = found.map(|(scope, _)| scope.name.clone()).collect();
        if others.is_empty() {
            return Ok(Some(first));
        }

        let mut candidates = vec![first_scope.name.clone()];
        candidates.extend(others);
        Err(BindError::AmbiguousColumn {
            name: name.to_string(),
            span,
            candidates,
        })
    }
}

/// Registries of enclosing statements, nearest first.
///
/// The chain is borrowed from the call stack: a nested bind pushes its
/// enclosing registry and passes the result down, so no registry is ever
/// shared across bind calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct OuterScopes<'a> {
    head: Option<(&'a TableScopeRegistry, &'a OuterScopes<'a>)>,
}

impl<'a> OuterScopes<'a> {
    /// A chain with no enclosing statement
    pub const fn empty() -> Self {
        Self { head: None }
    }

    /// Extend the chain with `registry` as the nearest enclosing scope
    pub fn push(&'a self, registry: &'a TableScopeRegistry) -> OuterScopes<'a> {
        OuterScopes {
            head: Some((registry, self)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Registries from nearest to outermost
    pub fn iter(&self) -> impl Iterator<Item = &'a TableScopeRegistry> {
        let mut current = self.head;
        std::iter::from_fn(move || {
            let (registry, rest) = current?;
            current = rest.head;
            Some(registry)
        })
    }
}

/// Chain used by top-level statements
pub(crate) static NO_OUTER_SCOPES: OuterScopes<'static> = OuterScopes::empty();

#[cfg(test)]
mod tests {
    use super::*;
    use sql_binder_ir::{ColumnBoundInfo, ColumnSegment};

    fn table_scope(name: &str, columns: &[&str]) -> TableScope {
        let columns = columns
            .iter()
            .map(|column| {
                ColumnProjection::new(
                    ColumnSegment::new(Span::default(), *column)
                        .with_owner(name)
                        .with_bound(ColumnBoundInfo::new("db", "public", name, *column)),
                )
            })
            .collect();
        TableScope::new(
            name,
            TableScopeSource::Table {
                table: name.to_string(),
                bound: TableBoundInfo::new("db", "public"),
            },
        )
        .with_columns(columns)
    }

    #[test]
    fn test_register_duplicate_alias_ignores_case() {
        let mut registry = TableScopeRegistry::new();
        registry.register(table_scope("u", &["id"]), Span::new(14, 14)).unwrap();

        let result = registry.register(table_scope("U", &["id"]), Span::new(30, 30));
        assert!(matches!(
            result,
            Err(BindError::DuplicateTableAlias { ref alias, span }) if alias == "U" && span == Span::new(30, 30)
        ));
    }

    #[test]
    fn test_find_column_qualified() {
        let mut registry = TableScopeRegistry::new();
        registry.register(table_scope("a", &["id", "x"]), Span::default()).unwrap();

        let found = registry.find_column(Some("A"), "X", Span::default()).unwrap();
        assert_eq!(found.unwrap().column.name, "x");

        assert!(registry.find_column(Some("c"), "x", Span::default()).unwrap().is_none());

        let missing = registry.find_column(Some("a"), "y", Span::new(40, 42));
        assert!(matches!(
            missing,
            Err(BindError::UnknownColumn { ref name, .. }) if name == "a.y"
        ));
    }

    #[test]
    fn test_find_column_ambiguous() {
        let mut registry = TableScopeRegistry::new();
        registry.register(table_scope("a", &["id", "x"]), Span::default()).unwrap();
        registry.register(table_scope("b", &["id"]), Span::default()).unwrap();

        let result = registry.find_column(None, "id", Span::new(7, 8));
        assert!(matches!(
            result,
            Err(BindError::AmbiguousColumn { ref candidates, .. }) if candidates == &vec!["a".to_string(), "b".to_string()]
        ));

        let x = registry.find_column(None, "x", Span::default()).unwrap().unwrap();
        assert_eq!(x.column.owner.as_deref(), Some("a"));
    }

    #[test]
    fn test_shadow_keeps_position() {
        let mut registry = TableScopeRegistry::new();
        registry.shadow(table_scope("s", &["id"]));
        registry.shadow(table_scope("t", &["id"]));
        registry.shadow(table_scope("S", &["id", "amount"]));

        let names: Vec<&str> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S", "t"]);
        assert_eq!(registry.get("s").unwrap().columns.len(), 2);
    }

    #[test]
    fn test_renamed_reowns_columns() {
        let scope = table_scope("t_order", &["order_id"]);
        let renamed = scope.renamed("recent", TableScopeSource::Cte("recent".to_string()));

        let column = &renamed.columns[0].column;
        assert_eq!(column.owner.as_deref(), Some("recent"));
        assert_eq!(column.bound.as_ref().unwrap().table, "t_order");
    }

    #[test]
    fn test_outer_scopes_nearest_first() {
        let mut outer_registry = TableScopeRegistry::new();
        outer_registry.register(table_scope("a", &["k"]), Span::default()).unwrap();
        let mut middle_registry = TableScopeRegistry::new();
        middle_registry.register(table_scope("b", &["v"]), Span::default()).unwrap();

        let root = OuterScopes::empty();
        assert!(root.is_empty());
        let first = root.push(&outer_registry);
        let second = first.push(&middle_registry);

        let names: Vec<&str> = second
            .iter()
            .map(|registry| registry.iter().next().unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
