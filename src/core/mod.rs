//! Core system foundations
//!
//! This module contains the building blocks shared by the storage layer:
//! configuration loading and the defaults the hosting runtime falls back to.

pub mod config;

// Re-export commonly used items
pub use config::{load_config, load_config_or_default, Config, StorageConfig};
