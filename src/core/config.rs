//! Configuration for the datadisk store
//!
//! This module handles configuration settings focused on storage. The
//! hosting runtime supplies the data directory here at construction time.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory holding one subdirectory per entity type
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &str) -> Result<Config> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path, e)))?;
    let config: Config =
        toml::from_str(&config_str).map_err(|e| Error::Config(format!("invalid {}: {}", path, e)))?;
    Ok(config)
}

/// Load configuration from file or use defaults
pub fn load_config_or_default(path: Option<&str>) -> Config {
    match path {
        Some(path) => match load_config(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from: {}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}. Using defaults.", path, e);
                Config::default()
            }
        },
        None => {
            tracing::info!("No config file specified, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_data_dir() {
        // Goal: Default config is usable without a config file
        let config = Config::default();
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn toml_config_sets_data_dir() {
        // Goal: The TOML shape load_config expects maps onto Config
        let config: Config = toml::from_str("[storage]\ndata_dir = \"/var/lib/bot\"\n").unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/bot"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        // Goal: A bad path degrades to defaults instead of failing startup
        let config = load_config_or_default(Some("/nonexistent/config.toml"));
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    }
}
