//! Configuration for the annotation editor
//!
//! Supports JSON and TOML files, stored by default in the platform config
//! directory. Configuration is organized into sections:
//! - Editing (size limits, aspect lock, handle geometry)
//! - History (undo depth, host permission)
//! - Logging (filter directive, output format)

use annotkit_editor::{AnnotationType, EditorOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "annotkit";

/// Edit tool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditingSettings {
    /// Minimum annotation width and height in page units (0 = none)
    pub minimum_annotation_size: f64,
    /// Maximum annotation width and height in page units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_annotation_size: Option<f64>,
    /// Draw the diagonal guide while an aspect-locked resize is running
    pub aspect_ratio_guide_enabled: bool,
    /// Types that keep their aspect ratio when resized
    pub aspect_locked_types: Vec<AnnotationType>,
    /// Drawn handle size in points
    pub handle_size: f64,
    /// Hit radius around each handle in page units
    pub hit_tolerance: f64,
}

impl Default for EditingSettings {
    fn default() -> Self {
        let options = EditorOptions::default();
        Self {
            minimum_annotation_size: options.minimum_annotation_size,
            maximum_annotation_size: options.maximum_annotation_size,
            aspect_ratio_guide_enabled: options.aspect_ratio_guide_enabled,
            aspect_locked_types: options.aspect_locked_types,
            handle_size: options.handle_size,
            hit_tolerance: options.handle_tolerance,
        }
    }
}

impl EditingSettings {
    /// Options for an `AnnotationEditController`.
    pub fn to_editor_options(&self) -> EditorOptions {
        EditorOptions {
            minimum_annotation_size: self.minimum_annotation_size,
            maximum_annotation_size: self.maximum_annotation_size,
            aspect_ratio_guide_enabled: self.aspect_ratio_guide_enabled,
            aspect_locked_types: self.aspect_locked_types.clone(),
            handle_size: self.handle_size,
            handle_tolerance: self.hit_tolerance,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Undoable actions kept before the oldest is dropped
    pub max_depth: usize,
    /// Host permission to record and replay undo
    pub undo_enabled: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            undo_enabled: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set, e.g. `info` or
    /// `annotkit_editor=debug`
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub editing: EditingSettings,
    pub history: HistorySettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> ConfigResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<platform config dir>/annotkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config directory on this platform".to_string())
            })
    }

    /// Load the config at the default path, or the defaults if there is no
    /// file yet. Also returns the file that was read, if any.
    pub fn load_or_default() -> SettingsResult<(Self, Option<PathBuf>)> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok((Self::default(), None));
        }
        let config = Self::load_from_file(&path)?;
        Ok((config, Some(path)))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let editing = &self.editing;
        if !editing.minimum_annotation_size.is_finite() || editing.minimum_annotation_size < 0.0 {
            return Err(out_of_range(
                "editing.minimum_annotation_size",
                editing.minimum_annotation_size,
            ));
        }

        if let Some(max) = editing.maximum_annotation_size {
            if !max.is_finite() || max <= 0.0 {
                return Err(out_of_range("editing.maximum_annotation_size", max));
            }
            if max < editing.minimum_annotation_size {
                return Err(ConfigError::Inconsistent(format!(
                    "maximum annotation size {} is below the minimum {}",
                    max, editing.minimum_annotation_size
                )));
            }
        }

        if !editing.handle_size.is_finite() || editing.handle_size <= 0.0 {
            return Err(out_of_range("editing.handle_size", editing.handle_size));
        }

        if !editing.hit_tolerance.is_finite() || editing.hit_tolerance < 0.0 {
            return Err(out_of_range("editing.hit_tolerance", editing.hit_tolerance));
        }

        if self.history.max_depth == 0 {
            return Err(out_of_range("history.max_depth", self.history.max_depth));
        }

        if self.logging.level.trim().is_empty() {
            return Err(out_of_range("logging.level", "\"\""));
        }

        Ok(())
    }
}
