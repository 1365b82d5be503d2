//! DuckDB SQL dialect.
//!
//! The dialect of the demo data engine: ANSI identifier quoting (`"`),
//! `strftime(date, '%Y-%m')` for date bucketing, `DATE '...'` literals.

use super::helpers;
use super::SqlDialect;

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    // Uses default emit_limit, strftime patterns and function names
}
