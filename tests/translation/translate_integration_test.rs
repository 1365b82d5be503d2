use std::sync::Arc;
use std::thread;

use nl2sql::sql::{validate_sql, Dialect};
use nl2sql::translate::{english_to_sql, TranslateOptions, Translator};

fn translate(text: &str, dialect: Dialect) -> nl2sql::Translation {
    Translator::default()
        .with_options(TranslateOptions::default().with_dialect(dialect))
        .translate(text)
        .unwrap()
}

/// The query with every single-quoted literal removed.
fn outside_literals(sql: &str) -> String {
    let mut out = String::new();
    let mut in_literal = false;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        match (in_literal, c) {
            (false, '\'') => in_literal = true,
            (true, '\'') if chars.peek() == Some(&'\'') => {
                chars.next();
            }
            (true, '\'') => in_literal = false,
            (true, '\\') => {
                chars.next();
            }
            (false, c) => out.push(c),
            (true, _) => {}
        }
    }
    out
}

#[test]
fn test_total_sales_by_category_duckdb() {
    let translation = translate("total sales by category in 2023", Dialect::DuckDb);
    insta::assert_snapshot!(translation.query, @r#"
    SELECT
      "products"."category" AS "category",
      SUM("orders"."quantity" * "orders"."price") AS "total_sales"
    FROM "orders"
    INNER JOIN "products" ON "orders"."product_id" = "products"."product_id"
    WHERE "orders"."order_date" >= DATE '2023-01-01' AND "orders"."order_date" < DATE '2024-01-01'
    GROUP BY "products"."category"
    ORDER BY "total_sales" DESC
    "#);
    assert_eq!(
        translation.description,
        "Total sales grouped by category, filtered to year 2023"
    );
}

#[test]
fn test_top_customers_postgres() {
    let translation = translate("Top 5 customers by total sales in 2023", Dialect::Postgres);
    insta::assert_snapshot!(translation.query, @r#"
    SELECT
      "customers"."customer_name" AS "customer_name",
      SUM("orders"."quantity" * "orders"."price") AS "total_sales"
    FROM "orders"
    INNER JOIN "customers" ON "orders"."customer_id" = "customers"."customer_id"
    WHERE "orders"."order_date" >= DATE '2023-01-01' AND "orders"."order_date" < DATE '2024-01-01'
    GROUP BY "customers"."customer_name"
    ORDER BY "total_sales" DESC
    LIMIT 5
    "#);
}

#[test]
fn test_empty_question_mysql() {
    let translation = translate("", Dialect::MySql);
    insta::assert_snapshot!(translation.query, @r#"
    SELECT
      COUNT(*) AS `order_count`
    FROM `orders`
    "#);
    assert_eq!(translation.description, "Number of orders");
}

#[test]
fn test_two_equality_clauses_filter_without_grouping() {
    let translation = translate(
        "total sales where category is food and region is north",
        Dialect::DuckDb,
    );
    assert!(translation
        .query
        .contains("\"products\".\"category\" = 'Food' AND \"customers\".\"region\" = 'North'"));
    assert!(!translation.query.contains("GROUP BY"));
    assert!(!translation.description.contains("grouped by"));
    validate_sql(&translation.query, Dialect::DuckDb).unwrap();
}

#[test]
fn test_hostile_input_stays_inside_literals() {
    let inputs = [
        "sales where customer is x'; DROP TABLE orders; --",
        "sales for region = 'North'; DELETE FROM customers --",
        "total sales by category -- comment",
        "'; SELECT * FROM customers; '",
        "sales where customer named Robert'); DROP TABLE students;--",
        "orders with customer called \\' OR 1=1 --",
    ];
    for dialect in [Dialect::DuckDb, Dialect::Postgres, Dialect::MySql] {
        for input in inputs {
            let sql = translate(input, dialect).query;
            let bare = outside_literals(&sql);
            assert!(!bare.contains(';'), "{:?}: {}", dialect, sql);
            assert!(!bare.contains("--"), "{:?}: {}", dialect, sql);
            assert!(!bare.contains('\''), "{:?}: {}", dialect, sql);
            validate_sql(&sql, dialect).unwrap();
        }
    }
}

#[test]
fn test_translation_is_deterministic() {
    let question = "average price by region and category since march 2022";
    let first = english_to_sql(question).unwrap();
    let second = english_to_sql(question).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.query.as_bytes(), second.query.as_bytes());
}

#[test]
fn test_translator_shared_across_threads() {
    let translator = Arc::new(Translator::default());
    let expected = translator.translate("monthly revenue in 2023").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let translator = Arc::clone(&translator);
            thread::spawn(move || translator.translate("monthly revenue in 2023").unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_translation_json() {
    let translation = english_to_sql("top 3 products by revenue xyzzy").unwrap();
    let json = serde_json::to_value(&translation).unwrap();

    assert_eq!(json["dialect"], "duckdb");
    assert_eq!(json["query"], translation.query.as_str());
    assert_eq!(json["intent"]["limit"], 3);
    assert_eq!(json["warnings"][0]["kind"], "unrecognized_token");
    assert_eq!(json["warnings"][0]["token"], "xyzzy");
}
