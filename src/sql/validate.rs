//! Round-trip validation of emitted SQL.
//!
//! Parses generated SQL with sqlparser-rs to confirm it is syntactically valid
//! for the target dialect and consists of exactly one statement. Used by the
//! test suite and by `nl2sql translate --check`.

use sqlparser::dialect::{DuckDbDialect, MySqlDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

/// Validates that a SQL string is a single, syntactically valid statement.
///
/// # Example
///
/// ```ignore
/// use nl2sql::sql::validate::validate_sql;
/// use nl2sql::sql::Dialect;
///
/// validate_sql("SELECT * FROM orders", Dialect::DuckDb).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect: Box<dyn sqlparser::dialect::Dialect> = match dialect {
        Dialect::DuckDb => Box::new(DuckDbDialect {}),
        Dialect::Postgres => Box::new(PostgreSqlDialect {}),
        Dialect::MySql => Box::new(MySqlDialect {}),
    };

    let statements = Parser::parse_sql(&*parser_dialect, sql)
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))?;

    match statements.len() {
        1 => Ok(()),
        n => Err(format!(
            "Expected exactly one statement for {:?}, found {}\nSQL: {}",
            dialect, n, sql
        )),
    }
}
