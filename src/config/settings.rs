//! TOML-based configuration for nl2sql.
//!
//! Example configuration:
//! ```toml
//! [translation]
//! dialect = "postgres"
//! min_year = 1990
//! max_year = 2035
//!
//! [log]
//! filter = "nl2sql=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sql::Dialect;
use crate::translate::TranslateOptions;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Translation defaults.
    pub translation: TranslationSettings,

    /// Log filter.
    pub log: LogSettings,
}

/// Translation defaults, overridable per command.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// SQL dialect: "duckdb", "postgres" or "mysql".
    pub dialect: Dialect,

    /// Earliest year a date cue may name.
    pub min_year: i32,

    /// Latest year a date cue may name.
    pub max_year: i32,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            min_year: 1900,
            max_year: 2100,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing-subscriber` filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and check settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NL2SQL_CONFIG`
    /// 2. `./nl2sql.toml`
    /// 3. `~/.config/nl2sql/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("NL2SQL_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("nl2sql.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("nl2sql").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.translation;
        if t.min_year > t.max_year {
            return Err(SettingsError::InvalidConfig(format!(
                "translation.min_year ({}) is after translation.max_year ({})",
                t.min_year, t.max_year
            )));
        }
        Ok(())
    }

    /// Translation options described by these settings.
    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions::default()
            .with_dialect(self.translation.dialect)
            .with_year_range(self.translation.min_year, self.translation.max_year)
    }
}
