//! TOML-based configuration.
//!
//! Supports a config file (`sqlcompose.toml`).
//!
//! Example configuration:
//! ```toml
//! [compose]
//! dialect = "postgres"        # legacy | postgres | redshift
//! date_column = "daily_cohort"
//! timezone = "local"          # or "utc", "+05:30"
//! max_depth = 64
//!
//! [logging]
//! filter = "sqlcompose=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::{CompileOptions, DateZone, DEFAULT_DATE_COLUMN, DEFAULT_MAX_DEPTH};
use crate::sql::Dialect;

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
    /// How compositions are compiled.
    pub compose: ComposeSettings,

    /// Log filter used when `RUST_LOG` is not set.
    pub logging: LoggingSettings,
}

/// Composition settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComposeSettings {
    /// SQL dialect to render.
    pub dialect: Dialect,

    /// Column the interval filter applies to.
    pub date_column: String,

    /// Zone for range bounds: "local", "utc" or an offset like "+02:00".
    pub timezone: String,

    /// Maximum `and`/`or` nesting.
    pub max_depth: usize,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            timezone: "local".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
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
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SQLCOMPOSE_CONFIG`
    /// 2. `./sqlcompose.toml`
    /// 3. `~/.config/sqlcompose/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SQLCOMPOSE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("sqlcompose.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("sqlcompose").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Build compile options from the `[compose]` section.
    pub fn compile_options(&self) -> Result<CompileOptions, SettingsError> {
        let compose = &self.compose;

        if compose.date_column.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "compose.date_column must not be empty".into(),
            ));
        }
        if compose.max_depth == 0 {
            return Err(SettingsError::InvalidConfig(
                "compose.max_depth must be at least 1".into(),
            ));
        }
        let zone: DateZone = compose
            .timezone
            .parse()
            .map_err(SettingsError::InvalidConfig)?;

        Ok(CompileOptions::default()
            .with_dialect(compose.dialect)
            .with_date_column(compose.date_column.clone())
            .with_date_zone(zone)
            .with_max_depth(compose.max_depth))
    }
}
