use nl2sql::catalog::{Aggregate, Catalog, ColumnRef};
use nl2sql::intent::{
    extract_intent, Dimension, Filter, FilterOp, FilterValue, IntentRecord, Measure, Metric,
    TimeGrain,
};
use nl2sql::sql::{validate_sql, Dialect};
use nl2sql::synth::{build_query, plan_joins, synthesize, SchemaResolutionError};

fn sql_for(text: &str, dialect: Dialect) -> String {
    let catalog = Catalog::demo();
    let intent = extract_intent(text, &catalog);
    synthesize(&intent, &catalog, dialect).unwrap().query
}

const QUESTIONS: &[&str] = &[
    "",
    "total sales by category in 2023",
    "top 5 customers by total sales in 2023",
    "bottom 3 products by quantity",
    "how many customers bought electronics",
    "number of products by category",
    "monthly revenue since march 2022",
    "yearly sales by region",
    "daily orders in 2024-02",
    "average price by region and category between 2021 and 2022",
    "sales where customer is O'Brien",
    "orders with quantity at least 10",
    "maximum price for furniture or toys sorted by category descending",
    "units sold by product alphabetically",
];

#[test]
fn test_every_dialect_parses_as_one_statement() {
    for dialect in [Dialect::DuckDb, Dialect::Postgres, Dialect::MySql] {
        for question in QUESTIONS {
            let sql = sql_for(question, dialect);
            if let Err(e) = validate_sql(&sql, dialect) {
                panic!("{:?} / {:?}: {}", dialect, question, e);
            }
        }
    }
}

#[test]
fn test_time_bucket_functions_per_dialect() {
    let question = "monthly revenue in 2023";
    assert!(sql_for(question, Dialect::DuckDb)
        .contains("STRFTIME(\"orders\".\"order_date\", '%Y-%m') AS \"month\""));
    assert!(sql_for(question, Dialect::Postgres)
        .contains("TO_CHAR(\"orders\".\"order_date\", 'YYYY-MM') AS \"month\""));
    assert!(sql_for(question, Dialect::MySql)
        .contains("DATE_FORMAT(`orders`.`order_date`, '%Y-%m') AS `month`"));
}

#[test]
fn test_half_open_year_window() {
    let sql = sql_for("sales in 2023", Dialect::Postgres);
    assert!(sql.contains(
        "WHERE \"orders\".\"order_date\" >= DATE '2023-01-01' \
         AND \"orders\".\"order_date\" < DATE '2024-01-01'"
    ));
}

#[test]
fn test_between_years_covers_both() {
    let sql = sql_for("sales between 2021 and 2022", Dialect::DuckDb);
    assert!(sql.contains(">= DATE '2021-01-01'"));
    assert!(sql.contains("< DATE '2023-01-01'"));
}

#[test]
fn test_single_aggregate_row_has_no_order_by() {
    let sql = sql_for("average price", Dialect::DuckDb);
    assert_eq!(
        sql,
        "SELECT\n  AVG(\"orders\".\"price\") AS \"avg_price\"\nFROM \"orders\""
    );
}

#[test]
fn test_dimension_only_tables_route_through_hub() {
    let catalog = Catalog::demo();
    let intent = IntentRecord {
        metric: Metric {
            aggregate: Aggregate::Count,
            measure: Measure::Rows {
                table: Some("customers".into()),
            },
        },
        dimensions: vec![Dimension::Column {
            column: ColumnRef::new("products", "category"),
        }],
        ..IntentRecord::default()
    };
    let sql = synthesize(&intent, &catalog, Dialect::DuckDb).unwrap().query;
    assert!(sql.contains("FROM \"orders\""), "{}", sql);
    assert!(sql.contains("INNER JOIN \"customers\""));
    assert!(sql.contains("INNER JOIN \"products\""));
    assert!(sql.contains("COUNT(DISTINCT \"customers\".\"customer_id\") AS \"customer_count\""));
}

#[test]
fn test_orders_counted_through_dimension_join_stay_plain() {
    let sql = sql_for("number of orders by region", Dialect::DuckDb);
    assert!(sql.contains("COUNT(*) AS \"order_count\""), "{}", sql);
    assert!(sql.contains("\"orders\".\"customer_id\" = \"customers\".\"customer_id\""));
    assert!(sql.contains("GROUP BY \"customers\".\"region\""));
}

#[test]
fn test_literals_never_break_out() {
    let catalog = Catalog::demo();
    let intent = IntentRecord {
        filters: vec![Filter {
            column: ColumnRef::new("customers", "customer_name"),
            op: FilterOp::Eq,
            values: vec![FilterValue::Text("x'; drop table orders; --".into())],
        }],
        ..IntentRecord::default()
    };
    let sql = synthesize(&intent, &catalog, Dialect::Postgres).unwrap().query;
    assert!(sql.contains("'x''; drop table orders; --'"), "{}", sql);
    validate_sql(&sql, Dialect::Postgres).unwrap();
}

#[test]
fn test_no_join_path() {
    let mut catalog = Catalog::demo();
    catalog.join_keys.clear();
    let intent = extract_intent("total sales by category", &catalog);
    let err = synthesize(&intent, &catalog, Dialect::DuckDb).unwrap_err();
    assert!(matches!(err, SchemaResolutionError::NoJoinPath { .. }));
    assert!(plan_joins(&catalog, &["orders".to_string(), "products".to_string()]).is_err());
}

#[test]
fn test_unknown_table_in_count() {
    let catalog = Catalog::demo();
    let intent = IntentRecord {
        metric: Metric {
            aggregate: Aggregate::Count,
            measure: Measure::Rows {
                table: Some("suppliers".into()),
            },
        },
        ..IntentRecord::default()
    };
    let err = build_query(&intent, &catalog).unwrap_err();
    assert_eq!(err, SchemaResolutionError::UnknownTable("suppliers".into()));
}

#[test]
fn test_time_bucket_on_other_date_column() {
    let catalog = Catalog::demo();
    let intent = IntentRecord {
        dimensions: vec![Dimension::TimeBucket {
            column: ColumnRef::new("customers", "signup_date"),
            grain: TimeGrain::Year,
        }],
        metric: Metric {
            aggregate: Aggregate::Count,
            measure: Measure::Rows {
                table: Some("customers".into()),
            },
        },
        ..IntentRecord::default()
    };
    let sql = synthesize(&intent, &catalog, Dialect::DuckDb).unwrap().query;
    assert!(sql.contains("FROM \"customers\""), "{}", sql);
    assert!(sql.contains("ORDER BY \"year\" ASC"));
}

#[test]
fn test_translation_carries_description_and_warnings() {
    let catalog = Catalog::demo();
    let intent = extract_intent("top 5 customers by total sales in 2023 pls", &catalog);
    let translation = synthesize(&intent, &catalog, Dialect::DuckDb).unwrap();
    assert_eq!(
        translation.description,
        "Total sales grouped by customer, filtered to year 2023, \
         sorted by total sales descending, limited to 5 rows. \
         Note: ignored unrecognized word \"pls\"."
    );
    assert_eq!(translation.warnings, intent.warnings);
    assert_eq!(translation.intent, intent);
}
