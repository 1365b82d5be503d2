use nl2sql::chart::{classify, ChartKind, Row};
use nl2sql::exec::ResultSet;
use serde_json::{json, Value};

fn result_set(value: Value) -> ResultSet {
    serde_json::from_value(value).unwrap()
}

fn chart_for(value: Value) -> Option<nl2sql::ChartSpec> {
    let result = result_set(value);
    classify(&result.columns, &result.rows)
}

#[test]
fn test_category_totals_are_a_bar_chart() {
    let chart = chart_for(json!({
        "columns": ["category", "total"],
        "rows": [
            {"category": "Food", "total": 120},
            {"category": "Toys", "total": 95},
            {"category": "Furniture", "total": 40}
        ]
    }))
    .unwrap();

    assert_eq!(chart.kind, ChartKind::Bar);
    assert_eq!(chart.label_column, "category");
    assert_eq!(chart.value_column, "total");
    assert_eq!(chart.labels, vec!["Food", "Toys", "Furniture"]);
    assert_eq!(chart.values, vec![120.0, 95.0, 40.0]);
}

#[test]
fn test_monthly_totals_are_a_line_chart() {
    let chart = chart_for(json!({
        "columns": ["month", "total"],
        "rows": [
            {"month": "2023-01", "total": 50},
            {"month": "2023-02", "total": 65}
        ]
    }))
    .unwrap();

    assert_eq!(chart.kind, ChartKind::Line);
    assert_eq!(chart.labels, vec!["2023-01", "2023-02"]);
}

#[test]
fn test_one_column_is_not_charted() {
    assert!(chart_for(json!({"columns": ["a"], "rows": [{"a": 1}]})).is_none());
}

#[test]
fn test_no_rows_is_not_charted() {
    assert!(chart_for(json!({"columns": ["category", "total"], "rows": []})).is_none());
}

#[test]
fn test_only_first_row_decides_column_types() {
    // The second row's label is a number and its value a string; both are coerced.
    let chart = chart_for(json!({
        "columns": ["year", "total_sales"],
        "rows": [
            {"year": "2022", "total_sales": 10.5},
            {"year": 2023, "total_sales": "n/a"}
        ]
    }))
    .unwrap();

    assert_eq!(chart.kind, ChartKind::Line);
    assert_eq!(chart.labels, vec!["2022", "2023"]);
    assert_eq!(chart.values[0], 10.5);
    assert!(chart.values[1].is_nan());
}

#[test]
fn test_chart_json_shape() {
    let rows: Vec<Row> = vec![
        json!({"region": "North", "order_count": 3}),
        json!({"region": "South", "order_count": null}),
    ]
    .into_iter()
    .map(|v| v.as_object().unwrap().clone())
    .collect();
    let chart = classify(&["region".into(), "order_count".into()], &rows).unwrap();

    assert_eq!(
        serde_json::to_value(&chart).unwrap(),
        json!({
            "kind": "bar",
            "label_column": "region",
            "value_column": "order_count",
            "labels": ["North", "South"],
            "values": [3.0, null]
        })
    );
}
