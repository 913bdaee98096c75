// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details
//
//! # Segment binders
//!
//! Leaf resolvers, one per segment kind. Each takes the scopes of the
//! statement being bound and returns a new, bound segment.

pub mod assignment;
pub mod clause;
pub mod combine;
pub mod expression;
pub mod lock;
pub mod parameter_marker;
pub mod projection;
pub mod table;
pub mod where_clause;
pub mod with;

pub use expression::ExpressionBinder;
pub use parameter_marker::ParameterMarkerCollector;
pub use projection::ProjectionsSegmentBinder;
pub use table::TableSegmentBinder;

#[cfg(test)]
pub(crate) mod fixtures {
    use sql_binder_catalog::{ColumnMetadata, DataType, DatabaseMetaData, MetaData, TableMetadata};
    use sql_binder_ir::{SimpleTableSegment, Span};

    use crate::context::BinderContext;
    use crate::scope::{OuterScopes, TableScopeRegistry};
    use crate::segment::{ParameterMarkerCollector, TableSegmentBinder};

    pub fn context_metadata() -> MetaData {
        let database = DatabaseMetaData::new("sharding_db")
            .with_table(TableMetadata::new("t_order", "public").with_columns(vec![
                ColumnMetadata::new("order_id", DataType::BigInt).with_primary_key(),
                ColumnMetadata::new("user_id", DataType::Integer),
                ColumnMetadata::new("status", DataType::Varchar(Some(32))),
                ColumnMetadata::new("merchant_id", DataType::Integer),
            ]))
            .with_table(TableMetadata::new("t_order_item", "public").with_columns(vec![
                ColumnMetadata::new("item_id", DataType::BigInt).with_primary_key(),
                ColumnMetadata::new("order_id", DataType::BigInt),
                ColumnMetadata::new("user_id", DataType::Integer),
                ColumnMetadata::new("price", DataType::Decimal),
            ]))
            .with_table(TableMetadata::new("t_user", "public").with_columns(vec![
                ColumnMetadata::new("user_id", DataType::Integer).with_primary_key(),
                ColumnMetadata::new("user_name", DataType::Varchar(Some(64))),
                ColumnMetadata::new("password", DataType::Varchar(Some(64))).invisible(),
            ]));
        MetaData::builder().with_database(database).build()
    }

    fn registry_for(context: &BinderContext<'_>, table: &str, alias: &str) -> TableScopeRegistry {
        let mut segment = SimpleTableSegment::new(Span::new(14, 14 + table.len()), table);
        if alias != table {
            segment = segment.with_alias(alias);
        }
        let mut registry = TableScopeRegistry::new();
        let outer = OuterScopes::empty();
        TableSegmentBinder::new(context, &outer)
            .bind(&segment.into(), &mut registry, &mut ParameterMarkerCollector::new())
            .unwrap();
        registry
    }

    pub fn order_registry(context: &BinderContext<'_>, alias: &str) -> TableScopeRegistry {
        registry_for(context, "t_order", alias)
    }

    pub fn user_registry(context: &BinderContext<'_>, alias: &str) -> TableScopeRegistry {
        registry_for(context, "t_user", alias)
    }
}
