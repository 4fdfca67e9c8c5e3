//! Configuration loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use twinlink_core::ReconcilerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Configuration together with where it came from
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    /// False when the file was missing and defaults are in use
    pub from_file: bool,
}

/// Load configuration from file, falling back to defaults when it is missing.
///
/// Runs before logging is set up; the caller logs the outcome.
pub fn load_config(path: &Path) -> Result<Loaded> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(Loaded {
            config,
            from_file: true,
        })
    } else {
        Ok(Loaded {
            config: Config::default(),
            from_file: false,
        })
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
