//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for the dialect differences
//! the translator runs into:
//!
//! - Identifier quoting: `"` (PG/DuckDB), `` ` `` (MySQL)
//! - String and date literal spelling
//! - Date bucketing format patterns (`strftime`, `to_char`, `date_format`)
//! - Function name remapping
//!
//! # Usage
//!
//! ```ignore
//! use nl2sql::sql::dialect::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Postgres;
//! let quoted = dialect.quote_identifier("orders");  // "orders"
//! ```

mod duckdb;
pub mod helpers;
mod mysql;
mod postgres;

pub use duckdb::DuckDb;
pub use mysql::MySql;
pub use postgres::Postgres;

use serde::{Deserialize, Serialize};

use super::expr::TimeGrain;
use super::token::TokenStream;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    ///
    /// - PostgreSQL/DuckDB: `"identifier"`
    /// - MySQL: `` `identifier` ``
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// All supported dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format a date literal: `DATE 'YYYY-MM-DD'`.
    fn format_date_literal(&self, date: &str) -> String {
        format!("DATE {}", self.quote_string(date))
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit the LIMIT clause.
    fn emit_limit(&self, limit: u64) -> TokenStream {
        helpers::emit_limit_standard(limit)
    }

    // =========================================================================
    // Date Bucketing
    // =========================================================================

    /// Format pattern passed to `STRFTIME` (after remapping) for a time grain.
    ///
    /// - DuckDB/MySQL: `%Y-%m`
    /// - PostgreSQL: `YYYY-MM`
    fn date_format_pattern(&self, grain: TimeGrain) -> &'static str {
        helpers::strftime_pattern(grain)
    }

    // =========================================================================
    // Function Remapping
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to keep original.
    /// The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }
}

/// SQL dialect enum for runtime selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    DuckDb,
    Postgres,
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::DuckDb => &DuckDb,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_null(&self) -> &'static str {
        self.dialect().format_null()
    }

    fn format_date_literal(&self, date: &str) -> String {
        self.dialect().format_date_literal(date)
    }

    fn emit_limit(&self, limit: u64) -> TokenStream {
        self.dialect().emit_limit(limit)
    }

    fn date_format_pattern(&self, grain: TimeGrain) -> &'static str {
        self.dialect().date_format_pattern(grain)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::DuckDb.to_string(), "duckdb");
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
        assert_eq!(Dialect::MySql.to_string(), "mysql");
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Dialect::DuckDb.quote_identifier("orders"), "\"orders\"");
        assert_eq!(Dialect::Postgres.quote_identifier("orders"), "\"orders\"");
        assert_eq!(Dialect::MySql.quote_identifier("orders"), "`orders`");
    }

    #[test]
    fn test_quote_identifier_escaping() {
        assert_eq!(
            Dialect::DuckDb.quote_identifier("weird\"name"),
            "\"weird\"\"name\""
        );
        assert_eq!(
            Dialect::MySql.quote_identifier("weird`name"),
            "`weird``name`"
        );
    }

    #[test]
    fn test_quote_string_escaping() {
        for dialect in [Dialect::DuckDb, Dialect::Postgres, Dialect::MySql] {
            assert_eq!(dialect.quote_string("it's"), "'it''s'");
        }
    }

    #[test]
    fn test_date_format_patterns() {
        assert_eq!(Dialect::DuckDb.date_format_pattern(TimeGrain::Month), "%Y-%m");
        assert_eq!(Dialect::Postgres.date_format_pattern(TimeGrain::Month), "YYYY-MM");
        assert_eq!(Dialect::MySql.date_format_pattern(TimeGrain::Year), "%Y");
    }

    #[test]
    fn test_remap_function_datetime() {
        assert_eq!(Dialect::DuckDb.remap_function("STRFTIME"), None);
        assert_eq!(Dialect::Postgres.remap_function("STRFTIME"), Some("TO_CHAR"));
        assert_eq!(Dialect::MySql.remap_function("strftime"), Some("DATE_FORMAT"));
        assert_eq!(Dialect::Postgres.remap_function("LOWER"), None);
    }
}
