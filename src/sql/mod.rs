//! SQL generation module.
//!
//! A type-safe builder for the SELECT statements the translator emits:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`validate`] - sqlparser round-trip validation

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;
pub mod validate;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, col, count, count_distinct, count_star, date_bucket, func, lit_date, lit_float, lit_int,
    lit_str, max, min, star, sum, table_col, BinaryOperator, Expr, ExprExt, Literal, TimeGrain,
};
pub use query::{Join, OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Token, TokenStream};
pub use validate::validate_sql;
