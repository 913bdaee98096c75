// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Engine-level behaviour: configuration, shared snapshots, catalog loading

use std::sync::Arc;

use sql_binder::{BindError, BinderConfig, StatementBinderEngine};
use sql_binder_catalog::MetaData;
use sql_binder_ir::{
    OrderByItem, OrderBySegment, Projection, SelectStatement, Span, SqlStatement,
};
use sql_binder_test_utils::fixtures::{col, owned_col, select, table};
use sql_binder_test_utils::{
    BindAssertions, MockCatalogBuilder, STANDARD_DATABASE, init_tracing, standard_metadata,
};

/// SELECT o.order_id AS id FROM t_order o ORDER BY id, missing
fn ordered_select() -> SqlStatement {
    let mut statement = select(
        vec![Projection::Column(
            sql_binder_ir::ColumnProjection::new(owned_col(7, "o", "order_id")).with_alias("id"),
        )],
        table(30, "t_order", Some("o")),
    );
    statement.order_by = Some(OrderBySegment {
        span: Span::new(42, 61),
        items: vec![
            OrderByItem::new(col(51, "id").into()),
            OrderByItem::new(col(55, "missing").into()),
        ],
    });
    SqlStatement::Select(statement)
}

fn order_items(statement: &SqlStatement) -> Vec<Option<String>> {
    let SqlStatement::Select(select) = statement else {
        panic!("expected select");
    };
    let mut bound = Vec::new();
    for item in &select.order_by.as_ref().unwrap().items {
        item.expr
            .visit_columns(&mut |c| bound.push(c.bound.as_ref().map(|b| b.qualified())));
    }
    bound
}

#[test]
fn test_order_by_lenient_by_default() {
    init_tracing();
    let metadata = standard_metadata();
    let bound = StatementBinderEngine::default()
        .bind(&ordered_select(), &metadata, Some(STANDARD_DATABASE))
        .unwrap();

    assert_eq!(
        order_items(&bound),
        vec![Some("sharding_db.t_order.order_id".to_string()), None]
    );
}

#[test]
fn test_config_from_yaml_makes_clauses_strict() {
    init_tracing();
    let config = BinderConfig::from_yaml_str(
        "defaultDatabase: sharding_db\nstrictClauseBinding: true\n",
    )
    .unwrap();
    let engine = StatementBinderEngine::new(config);
    let metadata = standard_metadata();

    assert!(matches!(
        engine.bind(&ordered_select(), &metadata, None),
        Err(BindError::UnknownColumn { ref name, .. }) if name == "missing"
    ));
}

#[test]
fn test_config_from_json_settings() {
    let settings = serde_json::json!({
        "sqlBinder": { "defaultDatabase": "sharding_db", "lateralDerivedTables": true }
    });
    let config = BinderConfig::from_json(&settings).unwrap();
    assert_eq!(config.default_database.as_deref(), Some("sharding_db"));
    assert_eq!(config.lateral_derived_tables, Some(true));
    assert!(!config.strict_clause_binding);

    assert!(BinderConfig::from_json(&serde_json::json!({ "defaultDatabase": "a.b" })).is_err());
}

#[test]
fn test_concurrent_binds_share_one_snapshot() {
    init_tracing();
    let metadata = Arc::new(standard_metadata());
    let engine = StatementBinderEngine::new(BinderConfig::new().with_default_database(STANDARD_DATABASE));
    let statement = SqlStatement::Select(select(
        vec![Projection::wildcard(Span::new(7, 7))],
        table(14, "t_order_item", None),
    ));
    let expected = engine.bind(&statement, &metadata, None).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let metadata = Arc::clone(&metadata);
            let engine = engine.clone();
            let statement = statement.clone();
            std::thread::spawn(move || engine.bind(&statement, &metadata, None))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_bind_against_loaded_catalog() {
    init_tracing();
    let catalog = MockCatalogBuilder::new().with_standard_schema().build();
    let metadata = MetaData::builder()
        .load_database("logic_db", &catalog)
        .await
        .unwrap()
        .build();

    let statement = SqlStatement::Select(select(
        vec![Projection::column(col(7, "status"))],
        table(19, "v_order_status", None),
    ));
    let bound = StatementBinderEngine::default()
        .bind(&statement, &metadata, Some("logic_db"))
        .unwrap();

    let SqlStatement::Select(select) = bound else {
        panic!("expected select");
    };
    let Projection::Column(status) = &select.projections.projections[0] else {
        panic!("expected column");
    };
    BindAssertions::assert_bound_to(&status.column, "logic_db.v_order_status.status");
    assert_eq!(
        select.from.as_ref().map(|from| from.span()),
        Some(Span::new(19, 32))
    );
    assert!(
        StatementBinderEngine::default()
            .bind(&SqlStatement::Select(SelectStatement::default()), &metadata, Some("sharding_db"))
            .is_err()
    );
}
