//! Configuration file helpers.
//!
//! Configuration is stored as pretty-printed JSON under
//! `$XDG_CONFIG_HOME/cuekit/` (falling back to `~/.config/cuekit/`).

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CuekitResult;

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cuekit=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Load a config value from `path`, falling back to `T::default()` when the
/// file is missing or cannot be parsed.
pub fn load_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to parse config at {:?}: {}", path, e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, e);
            }
        }
    }
    T::default()
}

/// Save a config value to `path`, creating parent directories.
pub fn save<T: Serialize>(config: &T, path: &Path) -> CuekitResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cuekit").join("config.json")
}
