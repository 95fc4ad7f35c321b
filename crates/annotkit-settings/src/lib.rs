//! annotkit Settings Crate
//!
//! Editor configuration: tunables for the edit tool, undo history limits and
//! logging, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, EditingSettings, HistorySettings, LoggingSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
