//! Error types and handling for the datadisk store
//!
//! This module defines all error types used throughout the system. A missing
//! document file is deliberately not represented here: the storage layer
//! normalizes it to the empty document.

use std::path::PathBuf;
use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the datadisk store
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem failure other than not-found during a read or write
    #[error("storage I/O failed for {}: {source}", path.display())]
    StorageIo {
        /// Path the filesystem operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON parse or serialize failure for an existing document
    #[error("corrupt document at {}: {source}", path.display())]
    CorruptDocument {
        /// Path of the document that failed to round-trip
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Write submitted after the coordinator shut down
    #[error("write coordinator is closed")]
    CoordinatorClosed,

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}
