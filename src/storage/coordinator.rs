//! Write coordinator
//!
//! Serializes keyword updates per document. Every document path gets its
//! own FIFO queue drained by a single worker task, so a change begins its
//! read-modify-write only after the previous change to the same document
//! has committed and been read back. That sequencing, not a lock around the
//! file, is what keeps two concurrent updates to different keywords of one
//! document from overwriting each other. Queues for distinct paths are
//! independent and make progress concurrently.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::storage::DocumentStore;
use crate::types::{Error, Result};

/// One pending keyword update awaiting application to its document.
struct ChangeRequest {
    keyword: String,
    value: Option<Value>,
    completion: oneshot::Sender<Result<Option<Value>>>,
}

/// Handle to a change accepted by the coordinator.
///
/// Resolves exactly once: to the value read back after the write commits,
/// or to the error that failed this one request.
pub struct PendingWrite {
    receiver: oneshot::Receiver<Result<Option<Value>>>,
}

impl PendingWrite {
    /// Wait for the write to commit and return the read-back value.
    pub async fn wait(self) -> Result<Option<Value>> {
        // A dropped completion sender means the worker was torn down
        // mid-request; report that as a closed coordinator.
        self.receiver.await.unwrap_or(Err(Error::CoordinatorClosed))
    }
}

/// Groups change requests by document path and applies each path's queue
/// strictly in submission order, one request in flight at a time.
pub struct WriteCoordinator {
    documents: Arc<DocumentStore>,

    /// Arena of per-document queues, keyed by document path
    queues: DashMap<PathBuf, mpsc::UnboundedSender<ChangeRequest>>,

    /// Worker handles, awaited on close so accepted writes drain first
    workers: Mutex<Vec<JoinHandle<()>>>,

    /// Set once by close(); submissions fail fast afterwards
    closed: AtomicBool,
}

impl WriteCoordinator {
    /// Create a coordinator that applies changes through `documents`.
    pub fn new(documents: Arc<DocumentStore>) -> Self {
        Self {
            documents,
            queues: DashMap::new(),
            workers: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueue one keyword update for the document at `path`.
    ///
    /// The queue for `path` is created on first use. Requests already
    /// accepted for the same path apply in submission order; `Some` inserts
    /// the value, `None` removes the keyword. Fails fast with
    /// [`Error::CoordinatorClosed`] once [`WriteCoordinator::close`] has
    /// run.
    pub fn submit_change(
        &self,
        path: PathBuf,
        keyword: &str,
        value: Option<Value>,
    ) -> Result<PendingWrite> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::CoordinatorClosed);
        }

        let (completion, receiver) = oneshot::channel();
        let request = ChangeRequest {
            keyword: keyword.to_owned(),
            value,
            completion,
        };

        let sender = self
            .queues
            .entry(path.clone())
            .or_insert_with(|| self.spawn_worker(path))
            .clone();

        // The send only fails if close() already dropped this queue.
        sender.send(request).map_err(|_| Error::CoordinatorClosed)?;
        Ok(PendingWrite { receiver })
    }

    /// Stop accepting writes and drain every queue.
    ///
    /// Requests accepted before the call still complete; only after the
    /// last worker finishes does the coordinator consider itself stopped.
    /// Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("write coordinator closing, draining queues");

        // Dropping the senders lets each worker finish its buffered
        // requests and exit its receive loop.
        self.queues.clear();

        let workers = std::mem::take(&mut *self.workers.lock());
        for worker in workers {
            let _ = worker.await;
        }
        tracing::debug!("write coordinator stopped");
    }

    /// Spawn the draining worker for one document path.
    fn spawn_worker(&self, path: PathBuf) -> mpsc::UnboundedSender<ChangeRequest> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ChangeRequest>();
        let documents = Arc::clone(&self.documents);

        let handle = tokio::spawn(async move {
            while let Some(ChangeRequest {
                keyword,
                value,
                completion,
            }) = receiver.recv().await
            {
                let result = apply_change(&documents, &path, &keyword, value).await;
                // An error fails only this request; the queue keeps going.
                // The caller may also have gone away, which is fine too.
                let _ = completion.send(result);
            }
        });
        self.workers.lock().push(handle);

        sender
    }
}

/// Apply one change: read, mutate a single keyword in the in-memory
/// mapping, write, and extract the keyword from the read-back.
async fn apply_change(
    documents: &DocumentStore,
    path: &Path,
    keyword: &str,
    value: Option<Value>,
) -> Result<Option<Value>> {
    tracing::debug!("write START: {} => {} = {:?}", path.display(), keyword, value);

    let mut document = documents.read_document(path).await?;
    match value {
        Some(value) => {
            document.insert(keyword.to_owned(), value);
        }
        None => {
            document.remove(keyword);
        }
    }

    let saved = documents.write_document(path, &document).await?;
    let saved_value = saved.get(keyword).cloned();

    tracing::debug!(
        "write END: {} => {} = {:?}",
        path.display(),
        keyword,
        saved_value
    );
    Ok(saved_value)
}
