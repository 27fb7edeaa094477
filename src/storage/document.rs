//! Raw document storage
//!
//! Maps an entity to its file path and performs whole-document JSON
//! read/parse and serialize/write. Reads never report "absent": a missing
//! file is materialized as the empty document first, so direct filesystem
//! inspection always sees valid JSON. Documents are assumed small enough
//! for whole-file handling; there is no caching layer and every call
//! touches disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

use crate::types::{Document, Error, Result};

/// Filename extension for entity documents
const DOCUMENT_EXT: &str = "json";

/// Sequence for unique temporary filenames within the process
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Raw JSON document storage rooted at a data directory.
///
/// Owns no in-memory state beyond the root path; the file on disk is the
/// single source of truth for every document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    /// Base directory holding one subdirectory per entity type
    data_dir: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at `data_dir`. The filesystem is untouched
    /// until [`DocumentStore::initialize`] runs.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Root directory of the store.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the root data directory if it does not exist yet.
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).await.map_err(|source| Error::StorageIo {
            path: self.data_dir.clone(),
            source,
        })
    }

    /// Deterministic document location: `{data_dir}/{entity_type}/{entity_id}.json`.
    pub fn document_path(&self, entity_type: &str, entity_id: &str) -> PathBuf {
        self.data_dir
            .join(entity_type)
            .join(format!("{}.{}", entity_id, DOCUMENT_EXT))
    }

    /// Create `{data_dir}/{entity_type}` if absent. Idempotent.
    pub async fn ensure_type_dir(&self, entity_type: &str) -> Result<()> {
        let dir = self.data_dir.join(entity_type);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| Error::StorageIo { path: dir, source })
    }

    /// Read and parse the document at `path`.
    ///
    /// A missing file is not an error: the empty document is written first
    /// and read back, so the caller always receives a mapping and the file
    /// exists afterwards. Malformed JSON surfaces as
    /// [`Error::CorruptDocument`]; any other filesystem failure as
    /// [`Error::StorageIo`].
    pub async fn read_document(&self, path: &Path) -> Result<Document> {
        match fs::read(path).await {
            Ok(contents) => parse_document(path, &contents),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.write_document(path, &Document::new()).await
            }
            Err(source) => Err(Error::StorageIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Serialize `document` to `path` and read it back.
    ///
    /// The bytes go to a temporary file in the same directory and are
    /// renamed into place, so a concurrent reader observes either the old
    /// or the new document, never a torn file. The parent directory is
    /// created if missing. The returned mapping is the freshly parsed
    /// read-back: whatever serialization round-tripping produced is what
    /// the caller sees as saved.
    pub async fn write_document(&self, path: &Path, document: &Document) -> Result<Document> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| Error::StorageIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_vec_pretty(document).map_err(|source| Error::CorruptDocument {
            path: path.to_path_buf(),
            source,
        })?;

        let tmp = tmp_path(path);
        fs::write(&tmp, &contents).await.map_err(|source| Error::StorageIo {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).await.map_err(|source| Error::StorageIo {
            path: path.to_path_buf(),
            source,
        })?;

        let contents = fs::read(path).await.map_err(|source| Error::StorageIo {
            path: path.to_path_buf(),
            source,
        })?;
        parse_document(path, &contents)
    }
}

/// Parse raw file contents as one JSON object.
fn parse_document(path: &Path, contents: &[u8]) -> Result<Document> {
    serde_json::from_slice(contents).map_err(|source| Error::CorruptDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Sibling temporary location used for atomic replacement. Unique per call
/// so concurrent creations of the same document cannot clobber each other's
/// temp file.
fn tmp_path(path: &Path) -> PathBuf {
    let seq = TMP_SEQ.fetch_add(1, Ordering::SeqCst);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", seq));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn scratch_store() -> (TempDir, DocumentStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = DocumentStore::new(dir.path().join("data"));
        (dir, store)
    }

    #[test]
    fn document_path_layout() {
        // Goal: Path derivation is exactly {data_dir}/{type}/{id}.json
        let store = DocumentStore::new("/tmp/bot-data");
        assert_eq!(
            store.document_path("guild", "guildId1"),
            PathBuf::from("/tmp/bot-data/guild/guildId1.json")
        );
    }

    #[tokio::test]
    async fn read_missing_document_materializes_empty_file() {
        // Goal: Read-or-create, never "read returns absent"
        let (_dir, store) = scratch_store();
        let path = store.document_path("guild", "g1");

        let doc = store.read_document(&path).await.unwrap();
        assert!(doc.is_empty());

        // The file now exists and holds a valid empty object.
        let on_disk = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, json!({}));
    }

    #[tokio::test]
    async fn write_then_read_back_round_trips() {
        // Goal: The returned mapping is the parsed read-back of the file
        let (_dir, store) = scratch_store();
        let path = store.document_path("guild", "g1");

        let mut doc = Document::new();
        doc.insert("keyword.json".into(), json!({"json": true}));
        doc.insert("keyword.null".into(), json!(null));

        let saved = store.write_document(&path, &doc).await.unwrap();
        assert_eq!(saved.get("keyword.json"), Some(&json!({"json": true})));
        assert_eq!(saved.get("keyword.null"), Some(&json!(null)));
    }

    #[tokio::test]
    async fn corrupt_document_is_reported_not_replaced() {
        // Goal: Parse failures surface as CorruptDocument and leave the file alone
        let (_dir, store) = scratch_store();
        let path = store.document_path("guild", "g1");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let err = store.read_document(&path).await.unwrap_err();
        assert!(matches!(err, Error::CorruptDocument { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
    }

    #[tokio::test]
    async fn ensure_type_dir_is_idempotent() {
        // Goal: Repeated calls succeed and leave the directory in place
        let (_dir, store) = scratch_store();
        store.ensure_type_dir("guild").await.unwrap();
        store.ensure_type_dir("guild").await.unwrap();
        assert!(store.data_dir().join("guild").is_dir());
    }

    #[tokio::test]
    async fn write_leaves_no_temp_file_behind() {
        // Goal: The temp-then-rename replacement cleans up after itself
        let (_dir, store) = scratch_store();
        let path = store.document_path("guild", "g1");
        store.write_document(&path, &Document::new()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("g1.json")]);
    }
}
