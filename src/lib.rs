//! # nl2sql
//!
//! A rule-based translator from analytics questions in English to SQL, with
//! automatic chart selection for the results.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        "top 5 customers by total sales in 2023"          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [intent: normalize, cue scan]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    IntentRecord                          │
//! │  (metric, dimensions, filters, ordering, limit, window)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [synth: resolve against Catalog, plan joins]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Query AST  →  SQL text + description            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [exec: QueryExecutor, supplied by the caller]
//! ┌─────────────────────────────────────────────────────────┐
//! │          ResultSet  →  ChartSpec (bar | line)            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`translate`] module wires the stages together; [`english_to_sql`] is
//! the one-call entry point.

pub mod catalog;
pub mod chart;
pub mod config;
pub mod exec;
pub mod intent;
pub mod sql;
pub mod synth;
pub mod translate;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{Aggregate, Catalog, ColumnRef, ColumnType};
    pub use crate::chart::{classify, ChartKind, ChartSpec, Row};
    pub use crate::exec::{answer, Answer, ExecutionError, QueryExecutor, ResultSet};
    pub use crate::intent::{extract_intent, Ambiguity, IntentRecord};
    pub use crate::sql::Dialect;
    pub use crate::synth::{synthesize, SchemaResolutionError, Translation};
    pub use crate::translate::{english_to_sql, TranslateError, TranslateOptions, Translator};
}

// Also export at crate root for convenience
pub use catalog::Catalog;
pub use chart::{classify, ChartSpec};
pub use intent::{extract_intent, IntentRecord};
pub use sql::Dialect;
pub use synth::{synthesize, Translation};
pub use translate::{english_to_sql, Translator};
