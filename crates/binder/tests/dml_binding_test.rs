// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end INSERT / UPDATE / DELETE / MERGE binding through the engine

use sql_binder::{BindError, StatementBinderEngine};
use sql_binder_ir::{
    ColumnAssignment, DeleteStatement, Dialect, Expr, InsertColumnsSegment, InsertStatement,
    InsertValuesSegment, MergeStatement, SetAssignmentSegment, Span, SqlStatement, TableSegment,
    UpdateStatement,
};
use sql_binder_test_utils::fixtures::{col, eq, marker, owned_col, table, where_clause};
use sql_binder_test_utils::{BindAssertions, STANDARD_DATABASE, init_tracing, standard_metadata};

fn bind(statement: SqlStatement) -> Result<SqlStatement, BindError> {
    init_tracing();
    let metadata = standard_metadata();
    StatementBinderEngine::default().bind(&statement, &metadata, Some(STANDARD_DATABASE))
}

#[test]
fn test_insert_markers_carry_column_slots() {
    // INSERT INTO t_order (order_id, user_id, status) VALUES (?, ?, 'PAID'), (?, ?, ?)
    let statement = InsertStatement::new(Dialect::MySQL)
        .with_table(table(12, "t_order", None))
        .with_columns(InsertColumnsSegment {
            span: Span::new(20, 46),
            columns: vec![col(21, "order_id"), col(31, "user_id"), col(40, "status")],
        })
        .with_values(vec![
            InsertValuesSegment {
                span: Span::new(55, 70),
                values: vec![
                    marker(56, 0),
                    marker(59, 1),
                    Expr::literal(Span::new(62, 67), sql_binder_ir::Literal::String("PAID".into())),
                ],
            },
            InsertValuesSegment {
                span: Span::new(73, 81),
                values: vec![marker(74, 2), marker(77, 3), marker(80, 4)],
            },
        ]);

    let SqlStatement::Insert(bound) = bind(SqlStatement::Insert(statement)).unwrap() else {
        panic!("expected insert");
    };
    let markers = &bound.attributes.parameter_markers;
    BindAssertions::assert_marker_indexes(markers, &[0, 1, 2, 3, 4]);
    BindAssertions::assert_marker_slots(
        markers,
        &[
            Some("sharding_db.t_order.order_id"),
            Some("sharding_db.t_order.user_id"),
            Some("sharding_db.t_order.order_id"),
            Some("sharding_db.t_order.user_id"),
            Some("sharding_db.t_order.status"),
        ],
    );
    let Expr::ParameterMarker(first) = &bound.values[0].values[0] else {
        panic!("expected marker");
    };
    assert_eq!(first, &markers[0]);
}

#[test]
fn test_update_set_marker_and_where() {
    // UPDATE t_order SET status = ? WHERE order_id = ?
    let statement = UpdateStatement::new(
        Dialect::MySQL,
        SetAssignmentSegment {
            span: Span::new(15, 28),
            assignments: vec![ColumnAssignment::new(col(19, "status"), marker(28, 0))],
        },
    )
    .with_table(table(7, "t_order", None))
    .with_where(where_clause(eq(col(36, "order_id"), marker(47, 1))));

    let SqlStatement::Update(bound) = bind(SqlStatement::Update(statement)).unwrap() else {
        panic!("expected update");
    };
    BindAssertions::assert_marker_slots(
        &bound.attributes.parameter_markers,
        &[Some("sharding_db.t_order.status"), None],
    );
    BindAssertions::assert_bound_to(
        &bound.set.assignments[0].columns[0],
        "sharding_db.t_order.status",
    );
}

#[test]
fn test_update_cannot_assign_unknown_column() {
    let statement = UpdateStatement::new(
        Dialect::MySQL,
        SetAssignmentSegment {
            span: Span::new(15, 28),
            assignments: vec![ColumnAssignment::new(col(19, "price"), marker(27, 0))],
        },
    )
    .with_table(table(7, "t_order", None));

    assert!(matches!(
        bind(SqlStatement::Update(statement)),
        Err(BindError::UnknownColumn { ref name, .. }) if name == "price"
    ));
}

#[test]
fn test_delete_where_bound_against_target() {
    // DELETE FROM t_order o WHERE o.user_id = ?
    let statement = DeleteStatement::new(Dialect::MySQL, table(12, "t_order", Some("o")))
        .with_where(where_clause(eq(owned_col(28, "o", "user_id"), marker(40, 0))));

    let SqlStatement::Delete(bound) = bind(SqlStatement::Delete(statement)).unwrap() else {
        panic!("expected delete");
    };
    let where_clause = bound.where_clause.unwrap();
    let Expr::BinaryOp { left, .. } = &where_clause.expr else {
        panic!("expected comparison");
    };
    BindAssertions::assert_column_expr(left, "sharding_db.t_order.user_id");
    assert_eq!(bound.attributes.parameter_markers.len(), 1);
}

#[test]
fn test_merge_values_marker_pairs_with_target_column() {
    // MERGE INTO t_order t USING t_user s ON t.user_id = s.user_id
    // WHEN NOT MATCHED THEN INSERT (user_id, status) VALUES (s.user_id, ?)
    let insert = InsertStatement::new(Dialect::Oracle)
        .with_columns(InsertColumnsSegment {
            span: Span::new(91, 107),
            columns: vec![col(92, "user_id"), col(101, "status")],
        })
        .with_values(vec![InsertValuesSegment {
            span: Span::new(116, 130),
            values: vec![Expr::column(owned_col(117, "s", "user_id")), marker(128, 0)],
        }]);
    let statement = MergeStatement::new(
        Dialect::Oracle,
        table(11, "t_order", Some("t")),
        table(27, "t_user", Some("s")),
    )
    .with_on(eq(owned_col(39, "t", "user_id"), owned_col(51, "s", "user_id")))
    .with_insert(insert);

    let SqlStatement::Merge(bound) = bind(SqlStatement::Merge(statement)).unwrap() else {
        panic!("expected merge");
    };
    BindAssertions::assert_marker_slots(
        &bound.attributes.parameter_markers,
        &[Some("sharding_db.t_order.status")],
    );
    let insert = bound.insert.unwrap();
    BindAssertions::assert_column_expr(&insert.values[0].values[0], "sharding_db.t_user.user_id");
}

#[test]
fn test_merge_branches_carry_bound_target() {
    // MERGE INTO t_order t USING t_user s ON t.user_id = s.user_id
    // WHEN MATCHED THEN UPDATE SET status = ?
    // WHEN NOT MATCHED THEN INSERT (user_id) VALUES (s.user_id)
    let update = UpdateStatement::new(
        Dialect::Oracle,
        SetAssignmentSegment {
            span: Span::new(90, 100),
            assignments: vec![ColumnAssignment::new(col(90, "status"), marker(99, 0))],
        },
    );
    let insert = InsertStatement::new(Dialect::Oracle)
        .with_columns(InsertColumnsSegment {
            span: Span::new(130, 139),
            columns: vec![col(131, "user_id")],
        })
        .with_values(vec![InsertValuesSegment {
            span: Span::new(147, 158),
            values: vec![Expr::column(owned_col(148, "s", "user_id"))],
        }]);
    let statement = MergeStatement::new(
        Dialect::Oracle,
        table(11, "t_order", Some("t")),
        table(27, "t_user", Some("s")),
    )
    .with_on(eq(owned_col(39, "t", "user_id"), owned_col(51, "s", "user_id")))
    .with_update(update)
    .with_insert(insert);

    let SqlStatement::Merge(bound) = bind(SqlStatement::Merge(statement)).unwrap() else {
        panic!("expected merge");
    };

    let insert_table = bound.insert.unwrap().table.expect("insert branch table");
    assert_eq!(insert_table.name.name, "t_order");
    assert_eq!(insert_table.alias.as_deref(), Some("t"));
    assert_eq!(insert_table.bound.as_ref().unwrap().database, "sharding_db");

    let Some(TableSegment::Simple(update_table)) = bound.update.unwrap().table else {
        panic!("expected the update branch to carry the target table");
    };
    assert_eq!(update_table, insert_table);
}

#[test]
fn test_merge_branch_cannot_write_source_column() {
    let update = UpdateStatement::new(
        Dialect::Oracle,
        SetAssignmentSegment {
            span: Span::new(90, 110),
            assignments: vec![ColumnAssignment::new(col(90, "user_name"), marker(102, 0))],
        },
    );
    let statement = MergeStatement::new(
        Dialect::Oracle,
        table(11, "t_order", Some("t")),
        table(27, "t_user", Some("s")),
    )
    .with_on(eq(owned_col(39, "t", "user_id"), owned_col(51, "s", "user_id")))
    .with_update(update);

    assert!(matches!(
        bind(SqlStatement::Merge(statement)),
        Err(BindError::UnknownColumn { ref name, .. }) if name == "user_name"
    ));
}
