//! Settings file handling for seamflip
//!
//! Settings are read from a JSON or TOML file, chosen by extension:
//! - `[processing]` controls how perimeter blocks are segmented
//! - `[output]` controls how the rewritten file is put in place

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use seamflip_core::policy::{ProcessingOptions, UnterminatedBlockPolicy};

/// Name of the per-user settings directory and file
const APP_DIR: &str = "seamflip";
const CONFIG_FILE: &str = "config.toml";

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Suffix appended to the target path for the temporary file
    pub temp_suffix: String,
    /// Copy the original to `<target>.bak` before replacing it
    pub keep_backup: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            temp_suffix: ".tmp".to_string(),
            keep_backup: false,
        }
    }
}

/// Complete settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Segmentation options
    pub processing: ProcessingOptions,
    /// Output settings
    pub output: OutputSettings,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
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
        tracing::debug!("loaded settings from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let suffix = &self.output.temp_suffix;
        if suffix.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "output.temp_suffix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if suffix.contains('/') || suffix.contains(std::path::MAIN_SEPARATOR) {
            return Err(SettingsError::InvalidSetting {
                key: "output.temp_suffix".to_string(),
                reason: "must not contain a path separator".to_string(),
            });
        }
        Ok(())
    }

    /// Per-user settings file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Resolve settings: an explicit path must exist, otherwise the per-user file is
    /// used when present, otherwise defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(SettingsError::LoadError(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                tracing::debug!("no settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
