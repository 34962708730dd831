//! Persisted user settings
//!
//! The anchor choice survives between runs in a small TOML file:
//!
//! ```toml
//! anchor = "canvas"   # or "active", "selected"
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arrange::{AnchorMode, ArrangeConfig, ParseModeError};

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write settings TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid setting: {0}")]
    InvalidValue(#[from] ParseModeError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub anchor: AnchorMode,
}

/// TOML structure for (de)serializing settings
#[derive(Serialize, Deserialize)]
struct TomlSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<String>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let anchor = match parsed.anchor {
            Some(name) => AnchorMode::from_str(&name)?,
            None => AnchorMode::default(),
        };
        Ok(Settings { anchor })
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        let out = TomlSettings {
            anchor: Some(self.anchor.as_str().to_string()),
        };
        Ok(toml::to_string(&out)?)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Operation configuration seeded from these settings
    pub fn to_config(&self) -> ArrangeConfig {
        ArrangeConfig::new().with_anchor(self.anchor)
    }
}

impl From<&Settings> for ArrangeConfig {
    fn from(settings: &Settings) -> Self {
        settings.to_config()
    }
}
