use nl2sql::catalog::{Aggregate, Catalog, ColumnRef};
use nl2sql::intent::{
    extract_intent, normalize, Ambiguity, Dimension, FilterOp, FilterValue, IntentRecord,
    Measure, OrderTarget, SortDir, TimeGrain, TimeWindow,
};

fn extract(text: &str) -> IntentRecord {
    extract_intent(text, &Catalog::demo())
}

#[test]
fn test_total_sales_by_category_in_year() {
    let intent = extract("total sales by category in 2023");

    assert_eq!(intent.metric.aggregate, Aggregate::Sum);
    assert_eq!(
        intent.metric.measure,
        Measure::Named {
            name: "sales".into()
        }
    );
    assert_eq!(
        intent.dimensions,
        vec![Dimension::Column {
            column: ColumnRef::new("products", "category")
        }]
    );
    assert_eq!(intent.time_window, Some(TimeWindow::Year { year: 2023 }));
    assert!(intent.filters.is_empty());
    assert_eq!(intent.limit, None);
    assert_eq!(intent.ordering, None);
    assert!(intent.warnings.is_empty());
}

#[test]
fn test_top_customers_by_total_sales() {
    let intent = extract("top 5 customers by total sales in 2023");

    assert_eq!(intent.metric.aggregate, Aggregate::Sum);
    assert_eq!(
        intent.dimensions,
        vec![Dimension::Column {
            column: ColumnRef::new("customers", "customer_name")
        }]
    );
    assert_eq!(intent.limit, Some(5));
    let ordering = intent.ordering.unwrap();
    assert_eq!(ordering.target, OrderTarget::Metric);
    assert_eq!(ordering.direction, SortDir::Desc);
}

#[test]
fn test_empty_question_counts_rows() {
    let intent = extract("");
    assert_eq!(intent, IntentRecord::default());
    assert_eq!(intent.metric.aggregate, Aggregate::Count);
    assert_eq!(intent.metric.measure, Measure::Rows { table: None });
}

#[test]
fn test_normalized_text_gives_same_intent() {
    let questions = [
        "Total Sales by Category in 2023!",
        "top 5 customers by total sales in 2023",
        "How many orders were placed in March 2024?",
        "average price for North, South and East by category",
        "sales where customer is O'Brien; DROP TABLE orders; --",
        "monthly revenue between 2022-01 and 2022-06",
        "orders with price over 9.99",
        "bottom 3 products by quantity sorted by product ascending",
        "  ",
    ];
    let catalog = Catalog::demo();
    for question in questions {
        assert_eq!(
            extract_intent(&normalize(question), &catalog),
            extract_intent(question, &catalog),
            "{}",
            question
        );
    }
}

#[test]
fn test_extraction_never_fails() {
    assert_eq!(extract("'; --"), IntentRecord::default());
    assert_eq!(extract("\u{1F600}\u{1F600}").time_window, None);

    let overflow = extract("99999999999999999999999999");
    assert_eq!(overflow.limit, None);
    assert_eq!(overflow.warnings.len(), 1);

    let bad_date = extract("sales 2023-13-45");
    assert_eq!(bad_date.time_window, None);

    let long = "sales ".repeat(2_000);
    let intent = extract(&long);
    assert_eq!(
        intent.metric.measure,
        Measure::Named {
            name: "sales".into()
        }
    );
}

#[test]
fn test_month_window_and_entity_count() {
    let intent = extract("how many orders were placed in march 2024");
    assert_eq!(intent.metric.aggregate, Aggregate::Count);
    assert_eq!(
        intent.metric.measure,
        Measure::Rows {
            table: Some("orders".into())
        }
    );
    assert_eq!(
        intent.time_window,
        Some(TimeWindow::Month {
            year: 2024,
            month: 3
        })
    );
}

#[test]
fn test_membership_filter_from_list() {
    let intent = extract("average price for North, South and East by category");
    let filter = intent
        .filter_on(&ColumnRef::new("customers", "region"))
        .unwrap();
    assert_eq!(filter.op, FilterOp::In);
    assert_eq!(
        filter.values,
        vec![
            FilterValue::Known("North".into()),
            FilterValue::Known("South".into()),
            FilterValue::Known("East".into()),
        ]
    );
}

#[test]
fn test_monthly_bucket() {
    let intent = extract("monthly revenue between 2022-01 and 2022-06");
    assert_eq!(
        intent.dimensions,
        vec![Dimension::TimeBucket {
            column: ColumnRef::new("orders", "order_date"),
            grain: TimeGrain::Month,
        }]
    );
    let window = intent.time_window.unwrap();
    assert_eq!(window.to_string(), "dates from 2022-01-01 to 2022-06-30");
}

#[test]
fn test_warnings_are_recorded_not_raised() {
    let intent = extract("average sales and total quantity by flavour");
    assert_eq!(intent.metric.aggregate, Aggregate::Avg);
    assert!(intent.warnings.contains(&Ambiguity::IgnoredMetricCue {
        cue: "total".into()
    }));
    assert!(intent.warnings.contains(&Ambiguity::UnrecognizedToken {
        token: "flavour".into()
    }));
}

#[test]
fn test_intent_serializes_with_tags() {
    let intent = extract("total sales by category in 2023");
    let json = serde_json::to_value(&intent).unwrap();
    assert_eq!(json["metric"]["aggregate"], "sum");
    assert_eq!(json["metric"]["measure"]["kind"], "named");
    assert_eq!(json["dimensions"][0]["kind"], "column");
    assert_eq!(json["time_window"]["kind"], "year");

    let back: IntentRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, intent);
}
