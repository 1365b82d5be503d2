//! End-to-end translation from English to SQL.
//!
//! ```text
//! text → normalize → cue scan → IntentRecord → resolve + plan joins → SQL
//!                                                                   ↘ description
//! ```
//!
//! # Example
//!
//! ```
//! use nl2sql::sql::Dialect;
//! use nl2sql::translate::{TranslateOptions, Translator};
//! use nl2sql::catalog::Catalog;
//!
//! let translator = Translator::new(Catalog::demo())
//!     .with_options(TranslateOptions::default().with_dialect(Dialect::Postgres));
//! let translation = translator.translate("total sales by category in 2023")?;
//! assert!(translation.query.starts_with("SELECT"));
//! # Ok::<(), nl2sql::translate::TranslateError>(())
//! ```

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::intent::{extract_intent_with, ExtractOptions, IntentRecord};
use crate::sql::Dialect;
use crate::synth::{synthesize, SchemaResolutionError, Translation};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during translation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("Schema resolution error: {0}")]
    Schema(#[from] SchemaResolutionError),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

// ============================================================================
// Options
// ============================================================================

/// Options for translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// SQL dialect to generate.
    pub dialect: Dialect,
    /// Year range accepted by date cues.
    pub extract: ExtractOptions,
}

impl TranslateOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Set the accepted year range.
    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Self {
        self.extract = ExtractOptions { min_year, max_year };
        self
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Owns a catalog and translates questions against it.
///
/// Holds no mutable state, so one translator can serve many threads.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Catalog,
    options: TranslateOptions,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Catalog::demo())
    }
}

impl Translator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            options: TranslateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Extract the intent only.
    pub fn intent(&self, text: &str) -> IntentRecord {
        extract_intent_with(text, &self.catalog, &self.options.extract)
    }

    /// Translate a question into SQL and a description.
    pub fn translate(&self, text: &str) -> TranslateResult<Translation> {
        let intent = self.intent(text);
        for warning in &intent.warnings {
            warn!(%warning, "ambiguous input");
        }

        let translation = synthesize(&intent, &self.catalog, self.options.dialect)?;
        info!(
            dialect = %self.options.dialect,
            description = %translation.description,
            "translated question"
        );
        Ok(translation)
    }
}

/// Translate against the built-in catalog with default options.
pub fn english_to_sql(text: &str) -> TranslateResult<Translation> {
    Translator::default().translate(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_translator_is_shareable() {
        assert_send_sync::<Translator>();
    }

    #[test]
    fn test_english_to_sql_empty_input() {
        let translation = english_to_sql("").unwrap();
        assert_eq!(
            translation.query,
            "SELECT\n  COUNT(*) AS \"order_count\"\nFROM \"orders\""
        );
        assert_eq!(translation.description, "Number of orders");
        assert!(translation.warnings.is_empty());
    }

    #[test]
    fn test_dialect_option() {
        let translator = Translator::default()
            .with_options(TranslateOptions::default().with_dialect(Dialect::MySql));
        let translation = translator.translate("total sales by region").unwrap();
        assert!(translation.query.contains("`region`"));
        assert_eq!(translation.dialect, Dialect::MySql);
    }

    #[test]
    fn test_year_range_option() {
        let translator = Translator::default()
            .with_options(TranslateOptions::default().with_year_range(2000, 2010));
        let intent = translator.intent("sales in 2023");
        assert!(intent.time_window.is_none());
        assert_eq!(intent.warnings.len(), 1);
    }

    #[test]
    fn test_schema_error_is_wrapped() {
        let mut catalog = Catalog::demo();
        catalog.measures.clear();
        let err = Translator::new(catalog).translate("total sales").unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Schema(SchemaResolutionError::UnknownMeasure(_))
        ));
    }
}
