//! Persistent size cache backed by a single JSON document
//!
//! The document is read once, on first access, and kept in memory for the
//! rest of the process. `set` and `clear` update the in-memory copy first and
//! then persist it, so reads in this process always see their own writes.
//! Persisting writes a sibling temp file and renames it over the document.

use crate::cache::record::SizeRecord;
use crate::error::{PkgSizeError, PkgSizeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Current on-disk schema version
const DOCUMENT_VERSION: u32 = 1;

/// On-disk shape of the cache file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheDocument {
    version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    entries: BTreeMap<String, SizeRecord>,
}

impl Default for CacheDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            updated_at: None,
            entries: BTreeMap::new(),
        }
    }
}

/// Key -> `SizeRecord` store persisted to one file
pub struct CacheStore {
    path: PathBuf,
    document: Mutex<Option<CacheDocument>>,
}

impl CacheStore {
    /// Create a store backed by `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: Mutex::new(None),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a record is stored under `key`
    pub async fn has(&self, key: &str) -> bool {
        let mut guard = self.document.lock().await;
        self.loaded(&mut guard).await.entries.contains_key(key)
    }

    /// The record stored under `key`, if any
    pub async fn get(&self, key: &str) -> Option<SizeRecord> {
        let mut guard = self.document.lock().await;
        self.loaded(&mut guard).await.entries.get(key).cloned()
    }

    /// Store `record` under `key`, replacing any previous value
    pub async fn set(&self, key: &str, record: SizeRecord) -> PkgSizeResult<()> {
        let mut guard = self.document.lock().await;
        let document = self.loaded(&mut guard).await;

        document.entries.insert(key.to_string(), record);
        document.updated_at = Some(Utc::now());

        let snapshot = document.clone();
        self.persist(&snapshot).await?;

        debug!("Cached {} ({} entries)", key, snapshot.entries.len());
        Ok(())
    }

    /// Remove every entry. Returns how many were removed.
    pub async fn clear(&self) -> PkgSizeResult<usize> {
        let mut guard = self.document.lock().await;
        let removed = self.loaded(&mut guard).await.entries.len();
        *guard = Some(CacheDocument::default());

        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(PkgSizeError::CachePersist {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }

        debug!("Cleared {} cache entries at {}", removed, self.path.display());
        Ok(removed)
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        let mut guard = self.document.lock().await;
        self.loaded(&mut guard).await.entries.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Materialize the document on first access
    async fn loaded<'a>(&self, slot: &'a mut Option<CacheDocument>) -> &'a mut CacheDocument {
        if slot.is_none() {
            *slot = Some(self.read_document().await);
        }
        slot.get_or_insert_with(CacheDocument::default)
    }

    /// Read the document from disk. Missing, unreadable and corrupt files all
    /// yield an empty cache.
    async fn read_document(&self) -> CacheDocument {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No cache file at {}", self.path.display());
                return CacheDocument::default();
            }
            Err(e) => {
                warn!("Failed to read cache {}: {}", self.path.display(), e);
                return CacheDocument::default();
            }
        };

        match serde_json::from_str::<CacheDocument>(&content) {
            Ok(doc) if doc.version == DOCUMENT_VERSION => {
                debug!("Loaded {} cache entries", doc.entries.len());
                doc
            }
            Ok(doc) => {
                warn!(
                    "Ignoring cache {} with unsupported version {}",
                    self.path.display(),
                    doc.version
                );
                CacheDocument::default()
            }
            Err(e) => {
                warn!("Ignoring corrupt cache {}: {}", self.path.display(), e);
                CacheDocument::default()
            }
        }
    }

    async fn persist(&self, document: &CacheDocument) -> PkgSizeResult<()> {
        let to_err = |source| PkgSizeError::CachePersist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(to_err)?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let temp_path = self.path.with_extension("json.tmp");

        fs::write(&temp_path, content).await.map_err(to_err)?;
        fs::rename(&temp_path, &self.path).await.map_err(to_err)?;

        Ok(())
    }
}
