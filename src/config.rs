//! TOML configuration for the watcher.
//!
//! Only compiled with the `config` feature. Values here are defaults; command-line flags
//! win over anything read from disk.

use crate::error::{QueryError, Result};
use crate::transform::TransformKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Placeholder text restored whenever the input is not focused.
    pub placeholder: String,
    /// Raw text the input starts with.
    pub initial_value: String,
    /// Normalization applied to the raw text.
    pub transform: TransformKind,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            placeholder: crate::element::memory::DEFAULT_PLACEHOLDER.to_string(),
            initial_value: String::new(),
            transform: TransformKind::default(),
        }
    }
}

impl WatchConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| QueryError::config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load the file at `default_path()` if it exists, otherwise fall back to defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("querywatch").join("config.toml"))
    }
}
