//! The execution boundary.
//!
//! Running a query is somebody else's job: a [`QueryExecutor`] takes SQL and
//! hands back a [`ResultSet`]. [`answer`] chains translation, execution and
//! chart selection for one question.

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::chart::{classify, ChartSpec, Row};
use crate::synth::Translation;
use crate::translate::{TranslateError, Translator};

// ============================================================================
// Error Types
// ============================================================================

/// A failure reported by the backend, message kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ExecutionError {
    pub message: String,
}

impl ExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors from [`answer`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnswerError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

// ============================================================================
// Executor
// ============================================================================

/// Rows returned by a query, with column names in select order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Runs SQL somewhere and returns its rows.
pub trait QueryExecutor {
    fn execute(&self, sql: &str) -> Result<ResultSet, ExecutionError>;
}

/// Everything produced for one question.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub translation: Translation,
    pub result: ResultSet,
    pub chart: Option<ChartSpec>,
}

/// Translate `text`, run the query, and pick a chart for the rows.
///
/// Execution errors are returned unchanged and never retried.
pub fn answer(
    translator: &Translator,
    executor: &dyn QueryExecutor,
    text: &str,
) -> Result<Answer, AnswerError> {
    let translation = translator.translate(text)?;

    let result = executor.execute(&translation.query).map_err(|e| {
        error!(error = %e, "query execution failed");
        e
    })?;
    debug!(rows = result.rows.len(), "query executed");

    let chart = classify(&result.columns, &result.rows);
    Ok(Answer {
        translation,
        result,
        chart,
    })
}
