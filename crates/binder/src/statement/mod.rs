// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Statement binders
//!
//! Orchestrators, one per statement kind, each sequencing the segment
//! binders in the order its scopes require. [`StatementBinderEngine`]
//! dispatches on the statement variant.

pub mod delete;
pub mod insert;
pub mod merge;
pub mod select;
pub mod update;

pub use delete::DeleteStatementBinder;
pub use insert::InsertStatementBinder;
pub use merge::MergeStatementBinder;
pub use select::SelectStatementBinder;
pub use update::UpdateStatementBinder;

use sql_binder_catalog::MetaData;
use sql_binder_ir::{Span, SqlStatement};
use tracing::instrument;

use crate::config::BinderConfig;
use crate::context::BinderContext;
use crate::error::{BindError, BindResult};

/// Entry point for binding any statement
#[derive(Debug, Clone, Default)]
pub struct StatementBinderEngine {
    config: BinderConfig,
}

impl StatementBinderEngine {
    pub fn new(config: BinderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Bind `statement` against `metadata`.
    ///
    /// `database` falls back to the configured default database. The dialect
    /// and declared variables are taken from the statement's attributes.
    ///
    /// # Errors
    ///
    /// - `NoDatabaseSelected` if no database is given or configured
    /// - `UnknownDatabase` if the metadata has no such database
    /// - any resolution error of the statement
    #[instrument(skip_all, fields(kind = statement.kind()))]
    pub fn bind(
        &self,
        statement: &SqlStatement,
        metadata: &MetaData,
        database: Option<&str>,
    ) -> BindResult<SqlStatement> {
        let database = database
            .or(self.config.default_database.as_deref())
            .ok_or(BindError::NoDatabaseSelected)?;
        if !metadata.contains_database(database) {
            return Err(BindError::UnknownDatabase {
                name: database.to_string(),
                span: Span::default(),
            });
        }

        let attributes = statement.attributes();
        let context = BinderContext::new(metadata, database, attributes.dialect)
            .with_config(&self.config)
            .with_variable_names(&attributes.variable_names);

        let bound = match statement {
            SqlStatement::Select(select) => {
                SqlStatement::Select(SelectStatementBinder::new(&context).bind(select)?)
            }
            SqlStatement::Insert(insert) => {
                SqlStatement::Insert(InsertStatementBinder::new(&context).bind(insert)?)
            }
            SqlStatement::Update(update) => {
                SqlStatement::Update(UpdateStatementBinder::new(&context).bind(update)?)
            }
            SqlStatement::Delete(delete) => {
                SqlStatement::Delete(DeleteStatementBinder::new(&context).bind(delete)?)
            }
            SqlStatement::Merge(merge) => {
                SqlStatement::Merge(MergeStatementBinder::new(&context).bind(merge)?)
            }
        };
        Ok(bound)
    }
}
