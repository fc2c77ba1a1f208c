//! Configuration module.
//!
//! Handles the TOML settings file and how it maps onto compile options.

mod settings;

pub use settings::{ComposeSettings, LoggingSettings, Settings, SettingsError};
