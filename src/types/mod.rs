//! Type definitions for the datadisk store

/// System-wide error types
pub mod error;

/// The JSON object persisted for one `(entity_type, entity_id)` entity.
///
/// Keys are keywords; values are arbitrary JSON. Absence of the backing
/// file is equivalent to the empty mapping.
pub type Document = serde_json::Map<String, serde_json::Value>;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
