//! Shared helper functions for SQL dialect implementations.
//!
//! Reusable building blocks that dialects compose to implement the
//! `SqlDialect` trait with minimal duplication.

use super::super::expr::TimeGrain;
use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string for MySQL, where a backslash is an escape character inside
/// string literals unless `NO_BACKSLASH_ESCAPES` is set.
pub fn quote_string_mysql(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT n`.
/// Used by: Postgres, DuckDB, MySQL
pub fn emit_limit_standard(limit: u64) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Limit)
        .space()
        .push(Token::LitInt(i64::try_from(limit).unwrap_or(i64::MAX)));
    ts
}

// =============================================================================
// Date Bucketing
// =============================================================================

/// `strftime`-style patterns (DuckDB, MySQL `DATE_FORMAT`).
pub fn strftime_pattern(grain: TimeGrain) -> &'static str {
    match grain {
        TimeGrain::Year => "%Y",
        TimeGrain::Month => "%Y-%m",
        TimeGrain::Day => "%Y-%m-%d",
    }
}

/// `to_char` patterns (Postgres).
pub fn to_char_pattern(grain: TimeGrain) -> &'static str {
    match grain {
        TimeGrain::Year => "YYYY",
        TimeGrain::Month => "YYYY-MM",
        TimeGrain::Day => "YYYY-MM-DD",
    }
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Replace `STRFTIME`, the only function emitted under another dialect's name.
pub fn remap_strftime(name: &str, target: &'static str) -> Option<&'static str> {
    name.eq_ignore_ascii_case("STRFTIME").then_some(target)
}
