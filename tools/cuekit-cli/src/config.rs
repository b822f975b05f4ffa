//! On-disk CLI configuration.

use std::path::Path;

use cuekit_common::config::{load_or_default, LoggingConfig};
use cuekit_track_model::EngineConfig;
use serde::{Deserialize, Serialize};

/// Contents of `config.json`. Missing sections take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> Self {
        load_or_default(path)
    }
}
