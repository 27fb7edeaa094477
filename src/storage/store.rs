//! Disk store facade
//!
//! Public get/set surface for the keyword store. Reads go straight to the
//! document store; writes funnel through the write coordinator. The facade
//! also ties the store into the host lifecycle: [`DiskStore::on_listen`]
//! wires the host's shutdown broadcast to coordinator teardown.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::broadcast;

use crate::core::config::StorageConfig;
use crate::storage::{DocumentStore, WriteCoordinator};
use crate::types::Result;

/// Disk-backed keyword store for `(entity_type, entity_id)` documents.
pub struct DiskStore {
    documents: Arc<DocumentStore>,
    writer: Arc<WriteCoordinator>,
}

impl DiskStore {
    /// Build a store from configuration. The filesystem is untouched until
    /// [`DiskStore::initialize`] runs.
    pub fn new(config: &StorageConfig) -> Self {
        let documents = Arc::new(DocumentStore::new(config.data_dir.clone()));
        let writer = Arc::new(WriteCoordinator::new(Arc::clone(&documents)));
        Self { documents, writer }
    }

    /// Create the store root directory.
    pub async fn initialize(&self) -> Result<()> {
        self.documents.initialize().await?;
        tracing::info!("datadisk store ready at {}", self.documents.data_dir().display());
        Ok(())
    }

    /// Read one keyword of an entity's document.
    ///
    /// Returns `None` for a keyword that was never set. The first access to
    /// an entity materializes its empty backing file. Reads do not
    /// synchronize with in-flight writes: a concurrent `set` on the same
    /// document may or may not be visible yet.
    pub async fn get(
        &self,
        entity_type: &str,
        entity_id: &str,
        keyword: &str,
    ) -> Result<Option<Value>> {
        self.documents.ensure_type_dir(entity_type).await?;
        let path = self.documents.document_path(entity_type, entity_id);
        let document = self.documents.read_document(&path).await?;
        Ok(document.get(keyword).cloned())
    }

    /// Write one keyword of an entity's document and return the value as it
    /// was read back after the commit.
    ///
    /// `None` removes the keyword, so the read-back reports it absent; that
    /// is the one deliberately lossy round-trip. Any other JSON value comes
    /// back structurally equal.
    pub async fn set(
        &self,
        entity_type: &str,
        entity_id: &str,
        keyword: &str,
        value: Option<Value>,
    ) -> Result<Option<Value>> {
        self.documents.ensure_type_dir(entity_type).await?;
        let path = self.documents.document_path(entity_type, entity_id);
        self.writer.submit_change(path, keyword, value)?.wait().await
    }

    /// Lifecycle hook for the hosting runtime: subscribe to its shutdown
    /// broadcast and close the write coordinator when it fires, draining
    /// already-accepted writes first.
    pub fn on_listen(&self, mut shutdown: broadcast::Receiver<()>) {
        let writer = Arc::clone(&self.writer);
        tokio::spawn(async move {
            // Lagged and closed both mean the host is going away.
            let _ = shutdown.recv().await;
            tracing::debug!("host shutdown signal received");
            writer.close().await;
        });
    }

    /// Stop accepting writes and drain the queues directly, for hosts that
    /// prefer explicit teardown over a broadcast signal.
    pub async fn close(&self) {
        self.writer.close().await;
    }
}
