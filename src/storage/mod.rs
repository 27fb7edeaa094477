//! Storage and persistence layer
//!
//! One JSON document on disk per entity. [`DocumentStore`] owns raw file
//! handling, [`WriteCoordinator`] serializes keyword updates per document,
//! and [`DiskStore`] is the public facade routing reads and writes.

/// Raw document read/write against the filesystem
pub mod document;

/// Per-document write serialization
pub mod coordinator;

/// Public get/set facade
pub mod store;

// Re-export main storage types
pub use coordinator::{PendingWrite, WriteCoordinator};
pub use document::DocumentStore;
pub use store::DiskStore;
