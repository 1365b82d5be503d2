//! Configuration for nl2sql.
//!
//! Handles the settings file and its lookup locations.

mod settings;

pub use settings::{LogSettings, Settings, SettingsError, TranslationSettings};
