//! # Datadisk
//!
//! Disk-backed per-entity keyword store. Each entity, identified by a type
//! and an id, is persisted as one JSON document on disk, and each keyword of
//! that document can be read or written independently. Concurrent writes to
//! the same document are serialized through a per-document FIFO pipeline;
//! writes to distinct documents proceed concurrently.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod storage;
pub mod types;

// Re-export commonly used items for convenience
pub use crate::core::config::{Config, StorageConfig};
pub use crate::storage::{DiskStore, DocumentStore, PendingWrite, WriteCoordinator};
pub use crate::types::{Document, Error, Result};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize tracing for the hosting process.
///
/// Hosts that already install their own subscriber can skip this.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Initializing {} v{}", NAME, VERSION);
    Ok(())
}
