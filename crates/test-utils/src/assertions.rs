// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Assertions over bound statement trees

use sql_binder_ir::{ColumnSegment, ColumnSource, Expr, ParameterMarker, Projection};

/// Custom assertion helpers for binding tests
pub struct BindAssertions;

impl BindAssertions {
    /// Assert that a column is bound to `database.table.column`
    pub fn assert_bound_to(column: &ColumnSegment, qualified: &str) {
        match &column.bound {
            Some(bound) => assert_eq!(
                bound.qualified(),
                qualified,
                "Column '{}' bound to the wrong origin",
                column.qualified()
            ),
            None => panic!("Column '{}' is not bound", column.qualified()),
        }
    }

    /// Assert that a column is bound and its value comes from `source`
    pub fn assert_source(column: &ColumnSegment, source: ColumnSource) {
        let bound = column
            .bound
            .as_ref()
            .unwrap_or_else(|| panic!("Column '{}' is not bound", column.qualified()));
        assert_eq!(bound.source, source, "Column '{}' source mismatch", column.qualified());
    }

    /// Assert that an expression is a column bound to `database.table.column`
    pub fn assert_column_expr(expr: &Expr, qualified: &str) {
        match expr {
            Expr::Column(column) => Self::assert_bound_to(column, qualified),
            _ => panic!("Expected Column expression, found {:?}", expr),
        }
    }

    /// Assert the output names of a SELECT list, in order
    pub fn assert_projection_names(projections: &[Projection], expected: &[&str]) {
        let names: Vec<String> = projections
            .iter()
            .map(|projection| match projection {
                Projection::Column(column) => column.output_name().to_string(),
                Projection::Expression(expr) => expr
                    .alias
                    .clone()
                    .unwrap_or_else(|| format!("{:?}", expr.expr)),
                Projection::Shorthand(shorthand) => match &shorthand.owner {
                    Some(owner) => format!("{}.*", owner),
                    None => "*".to_string(),
                },
            })
            .collect();
        assert_eq!(names, expected, "Projection names mismatch");
    }

    /// Assert the parameter indexes of a marker list, in order
    pub fn assert_marker_indexes(markers: &[ParameterMarker], expected: &[usize]) {
        let indexes: Vec<usize> = markers.iter().map(|m| m.index).collect();
        assert_eq!(indexes, expected, "Parameter marker order mismatch");
    }

    /// Assert the column slot each marker fills, `None` for unpaired markers
    pub fn assert_marker_slots(markers: &[ParameterMarker], expected: &[Option<&str>]) {
        let slots: Vec<Option<String>> = markers
            .iter()
            .map(|m| m.bound.as_ref().map(|b| b.qualified()))
            .collect();
        let expected: Vec<Option<String>> =
            expected.iter().map(|e| e.map(str::to_string)).collect();
        assert_eq!(slots, expected, "Parameter marker slots mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_binder_ir::{ColumnBoundInfo, Span};

    #[test]
    fn test_assert_bound_to() {
        let column = ColumnSegment::new(Span::new(0, 5), "status")
            .with_bound(ColumnBoundInfo::new("sharding_db", "public", "t_order", "status"));
        BindAssertions::assert_bound_to(&column, "sharding_db.t_order.status");
        BindAssertions::assert_source(&column, ColumnSource::Table);
    }

    #[test]
    #[should_panic(expected = "is not bound")]
    fn test_assert_bound_to_unbound() {
        let column = ColumnSegment::new(Span::new(0, 5), "status");
        BindAssertions::assert_bound_to(&column, "sharding_db.t_order.status");
    }
}
