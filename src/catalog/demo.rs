//! The built-in three-table sales catalog.

use super::{Aggregate, Catalog, Column, ColumnRef, ColumnType, JoinKey, MeasureDef, MeasureExpr, Table};

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn column(name: &str, data_type: ColumnType, synonyms: &[&str]) -> Column {
    Column {
        name: name.into(),
        data_type,
        is_measure_input: false,
        synonyms: words(synonyms),
        known_values: vec![],
    }
}

fn enumerated(name: &str, synonyms: &[&str], values: &[&str]) -> Column {
    Column {
        known_values: words(values),
        ..column(name, ColumnType::Text, synonyms)
    }
}

fn measure_input(name: &str, synonyms: &[&str]) -> Column {
    Column {
        is_measure_input: true,
        ..column(name, ColumnType::Numeric, synonyms)
    }
}

fn measure(name: &str, expr: MeasureExpr, synonyms: &[&str], aggregate: Aggregate) -> MeasureDef {
    MeasureDef {
        name: name.into(),
        table: "orders".into(),
        expr,
        synonyms: words(synonyms),
        default_aggregate: aggregate,
    }
}

impl Catalog {
    /// The demo schema: `customers`, `orders` and `products`.
    pub fn demo() -> Self {
        let customers = Table {
            name: "customers".into(),
            primary_key: "customer_id".into(),
            columns: vec![
                column("customer_id", ColumnType::Numeric, &[]),
                column(
                    "customer_name",
                    ColumnType::Text,
                    &["customer", "customer name", "client", "buyer"],
                ),
                enumerated(
                    "region",
                    &["region", "area", "territory"],
                    &["North", "South", "East", "West"],
                ),
                column("signup_date", ColumnType::Date, &["signup date"]),
            ],
            synonyms: words(&["customer", "customers", "client", "clients", "buyer", "buyers"]),
        };

        let orders = Table {
            name: "orders".into(),
            primary_key: "order_id".into(),
            columns: vec![
                column("order_id", ColumnType::Numeric, &[]),
                column("customer_id", ColumnType::Numeric, &[]),
                column("product_id", ColumnType::Numeric, &[]),
                column("order_date", ColumnType::Date, &["order date", "date"]),
                measure_input("quantity", &["quantity", "qty", "units"]),
                measure_input("price", &["price", "unit price"]),
            ],
            synonyms: words(&[
                "order",
                "orders",
                "purchase",
                "purchases",
                "transaction",
                "transactions",
            ]),
        };

        let products = Table {
            name: "products".into(),
            primary_key: "product_id".into(),
            columns: vec![
                column("product_id", ColumnType::Numeric, &[]),
                column(
                    "product_name",
                    ColumnType::Text,
                    &["product", "product name", "item"],
                ),
                enumerated(
                    "category",
                    &["category", "product category"],
                    &["Electronics", "Furniture", "Food", "Clothing", "Toys"],
                ),
            ],
            synonyms: words(&["product", "products", "item", "items"]),
        };

        Catalog {
            version: 1,
            default_table: "orders".into(),
            default_measure: "sales".into(),
            date_column: ColumnRef::new("orders", "order_date"),
            tables: vec![customers, orders, products],
            join_keys: vec![
                JoinKey {
                    left: ColumnRef::new("orders", "customer_id"),
                    right: ColumnRef::new("customers", "customer_id"),
                },
                JoinKey {
                    left: ColumnRef::new("orders", "product_id"),
                    right: ColumnRef::new("products", "product_id"),
                },
            ],
            measures: vec![
                measure(
                    "sales",
                    MeasureExpr::Product("quantity".into(), "price".into()),
                    &["sale", "revenue", "turnover", "amount"],
                    Aggregate::Sum,
                ),
                measure(
                    "quantity",
                    MeasureExpr::Column("quantity".into()),
                    &["qty", "units", "units sold"],
                    Aggregate::Sum,
                ),
                measure(
                    "price",
                    MeasureExpr::Column("price".into()),
                    &["prices", "unit price"],
                    Aggregate::Avg,
                ),
            ],
        }
    }
}
