//! Configuration loading
//!
//! Settings types implement [`Config`] to gain file loading in TOML or RON,
//! selected by file extension.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors produced while loading or saving configuration files
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// RON parsing failed
    #[error("ron parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON serialization failed
    #[error("ron serialize error: {0}")]
    RonSerialize(#[from] ron::Error),

    /// The file extension is not a supported config format
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Trait for types loadable from configuration files
pub trait Config: Serialize + DeserializeOwned + Default {
    /// Load from a TOML or RON file, chosen by extension
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match extension_of(path) {
            Some("toml") => Ok(toml::from_str(&contents)?),
            Some("ron") => Ok(ron::from_str(&contents)?),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    /// Save to a TOML or RON file, chosen by extension
    fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = match extension_of(path) {
            Some("toml") => toml::to_string_pretty(self)?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load from a file, falling back to defaults when the file is missing
    fn load_or_default(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("failed to load config from {}: {err}", path.display());
                Self::default()
            }
        }
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}
