//! Schema catalog: the tables, columns, join keys and measures the
//! translator is allowed to talk about.
//!
//! The catalog is an immutable value. It is built once (see [`Catalog::demo`])
//! and passed by reference to the extractor and the synthesizer; nothing in
//! the crate holds it as global state.

mod demo;

use serde::{Deserialize, Serialize};

/// Storage class of a column, as far as the translator cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Text,
    Date,
}

/// Aggregation applied to a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl Aggregate {
    /// SQL function name.
    pub fn sql_name(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }

    /// Prefix used for result column aliases (`total_sales`, `avg_price`).
    pub fn alias_prefix(&self) -> &'static str {
        match self {
            Aggregate::Count => "count",
            Aggregate::Sum => "total",
            Aggregate::Avg => "avg",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
        }
    }

    /// Word used in descriptions (`Total sales`, `Average price`).
    pub fn label(&self) -> &'static str {
        match self {
            Aggregate::Count => "Count",
            Aggregate::Sum => "Total",
            Aggregate::Avg => "Average",
            Aggregate::Min => "Minimum",
            Aggregate::Max => "Maximum",
        }
    }
}

/// A fully qualified column: `table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// A column of a catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
    /// Feeds a derived measure (e.g. `quantity` and `price` feed `sales`).
    pub is_measure_input: bool,
    /// Lowercase words or phrases that refer to this column.
    pub synonyms: Vec<String>,
    /// Enumerated values, in canonical casing. Empty when the column is free text.
    pub known_values: Vec<String>,
}

impl Column {
    /// Find the canonical spelling of a known value, case-insensitively.
    pub fn canonical_value(&self, value: &str) -> Option<&str> {
        self.known_values
            .iter()
            .find(|v| v.eq_ignore_ascii_case(value))
            .map(String::as_str)
    }
}

/// A catalog table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub primary_key: String,
    pub columns: Vec<Column>,
    /// Entity nouns ("customer", "customers") used as count subjects.
    pub synonyms: Vec<String>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Declared equi-join between two tables. Undirected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinKey {
    pub left: ColumnRef,
    pub right: ColumnRef,
}

impl JoinKey {
    /// Whether this key links the two tables (in either direction).
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.left.table == a && self.right.table == b)
            || (self.left.table == b && self.right.table == a)
    }
}

/// How a measure is computed from columns of its table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureExpr {
    /// A single numeric column.
    Column(String),
    /// The product of two numeric columns (`quantity * price`).
    Product(String, String),
}

impl MeasureExpr {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            MeasureExpr::Column(c) => vec![c.as_str()],
            MeasureExpr::Product(a, b) => vec![a.as_str(), b.as_str()],
        }
    }
}

/// A named numeric quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDef {
    pub name: String,
    pub table: String,
    pub expr: MeasureExpr,
    pub synonyms: Vec<String>,
    /// Aggregate used when the measure is mentioned without a cue ("sales by region").
    pub default_aggregate: Aggregate,
}

/// The schema catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    /// Table counted when nothing else pins down the query's subject.
    pub default_table: String,
    /// Measure used when an aggregate cue names no measure.
    pub default_measure: String,
    /// Date column that time windows and time buckets apply to.
    pub date_column: ColumnRef,
    pub tables: Vec<Table>,
    pub join_keys: Vec<JoinKey>,
    pub measures: Vec<MeasureDef>,
}

impl Catalog {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn column(&self, column: &ColumnRef) -> Option<&Column> {
        self.table(&column.table)?.column(&column.column)
    }

    pub fn measure(&self, name: &str) -> Option<&MeasureDef> {
        self.measures.iter().find(|m| m.name == name)
    }

    /// Position of a table in catalog order, used to keep join output stable.
    pub fn table_position(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    /// Declared join key between two tables, if any.
    pub fn join_key(&self, a: &str, b: &str) -> Option<&JoinKey> {
        self.join_keys.iter().find(|k| k.links(a, b))
    }

    /// Every `(table, column)` pair in catalog order.
    pub fn columns(&self) -> impl Iterator<Item = (&Table, &Column)> {
        self.tables
            .iter()
            .flat_map(|t| t.columns.iter().map(move |c| (t, c)))
    }

    /// Resolve a column synonym phrase (lowercase, space separated).
    pub fn column_by_synonym(&self, phrase: &str) -> Option<ColumnRef> {
        self.columns()
            .find(|(_, c)| c.synonyms.iter().any(|s| s == phrase))
            .map(|(t, c)| ColumnRef::new(&t.name, &c.name))
    }

    /// Resolve an entity noun ("customers") to its table.
    pub fn table_by_synonym(&self, phrase: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.synonyms.iter().any(|s| s == phrase))
    }

    /// Resolve a measure noun ("revenue") to its measure.
    pub fn measure_by_synonym(&self, phrase: &str) -> Option<&MeasureDef> {
        self.measures
            .iter()
            .find(|m| m.name == phrase || m.synonyms.iter().any(|s| s == phrase))
    }

    /// Find the column enumerating a value ("food" → products.category, "Food").
    pub fn column_by_known_value(&self, value: &str) -> Option<(ColumnRef, String)> {
        self.columns().find_map(|(t, c)| {
            c.canonical_value(value)
                .map(|v| (ColumnRef::new(&t.name, &c.name), v.to_string()))
        })
    }

    /// Longest synonym, known value or entity phrase, in words. Bounds phrase lookahead.
    pub fn max_phrase_words(&self) -> usize {
        let column_phrases = self.columns().flat_map(|(_, c)| {
            c.synonyms
                .iter()
                .chain(c.known_values.iter())
                .map(|s| s.split_whitespace().count())
        });
        let measure_phrases = self
            .measures
            .iter()
            .flat_map(|m| m.synonyms.iter().map(|s| s.split_whitespace().count()));
        let table_phrases = self
            .tables
            .iter()
            .flat_map(|t| t.synonyms.iter().map(|s| s.split_whitespace().count()));
        column_phrases
            .chain(measure_phrases)
            .chain(table_phrases)
            .max()
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_tables() {
        let catalog = Catalog::demo();
        let names: Vec<&str> = catalog.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["customers", "orders", "products"]);
        assert_eq!(catalog.default_table, "orders");
    }

    #[test]
    fn test_sales_measure_is_quantity_times_price() {
        let catalog = Catalog::demo();
        let sales = catalog.measure("sales").unwrap();
        assert_eq!(sales.table, "orders");
        assert_eq!(
            sales.expr,
            MeasureExpr::Product("quantity".into(), "price".into())
        );
        let orders = catalog.table("orders").unwrap();
        assert!(orders.column("quantity").unwrap().is_measure_input);
        assert!(orders.column("price").unwrap().is_measure_input);
    }

    #[test]
    fn test_join_keys_are_undirected() {
        let catalog = Catalog::demo();
        assert!(catalog.join_key("orders", "customers").is_some());
        assert!(catalog.join_key("customers", "orders").is_some());
        assert!(catalog.join_key("customers", "products").is_none());
    }

    #[test]
    fn test_synonym_lookup() {
        let catalog = Catalog::demo();
        assert_eq!(
            catalog.column_by_synonym("category"),
            Some(ColumnRef::new("products", "category"))
        );
        assert_eq!(
            catalog.column_by_synonym("customer"),
            Some(ColumnRef::new("customers", "customer_name"))
        );
        assert_eq!(catalog.table_by_synonym("clients").unwrap().name, "customers");
        assert_eq!(catalog.measure_by_synonym("revenue").unwrap().name, "sales");
        assert!(catalog.column_by_synonym("banana").is_none());
    }

    #[test]
    fn test_known_value_lookup_is_case_insensitive() {
        let catalog = Catalog::demo();
        let (column, value) = catalog.column_by_known_value("food").unwrap();
        assert_eq!(column, ColumnRef::new("products", "category"));
        assert_eq!(value, "Food");
        assert!(catalog.column_by_known_value("spaceships").is_none());
    }

    #[test]
    fn test_every_join_key_and_measure_resolves() {
        let catalog = Catalog::demo();
        for key in &catalog.join_keys {
            assert!(catalog.column(&key.left).is_some(), "{}", key.left);
            assert!(catalog.column(&key.right).is_some(), "{}", key.right);
        }
        for measure in &catalog.measures {
            let table = catalog.table(&measure.table).unwrap();
            for column in measure.expr.columns() {
                assert!(table.column(column).is_some(), "{}.{}", measure.table, column);
            }
        }
        assert!(catalog.column(&catalog.date_column).is_some());
    }
}
