//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features relevant here:
//! - ANSI identifier quoting (`"`)
//! - `to_char(date, 'YYYY-MM')` for date bucketing

use super::helpers;
use super::SqlDialect;
use crate::sql::expr::TimeGrain;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn date_format_pattern(&self, grain: TimeGrain) -> &'static str {
        helpers::to_char_pattern(grain)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_strftime(name, "TO_CHAR")
    }
}
