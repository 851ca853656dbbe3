//! Cache of fetched documents and their parsed layouts.
//!
//! Entries are keyed by design URL and target framework and are upserted,
//! so a later `put` for the same key replaces the earlier entry.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::layout::LayoutDocument;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub design_url: String,
    pub framework: String,
}

impl CacheKey {
    pub fn new(design_url: &str, framework: &str) -> Self {
        Self {
            design_url: design_url.to_string(),
            framework: framework.to_string(),
        }
    }

    /// Stable hex digest of the key, used as a file name
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.design_url.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.framework.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A cached raw document with the layout built from it.
///
/// Document and layout are shared, so handing an entry out never copies
/// the trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLayout {
    pub key: CacheKey,
    #[serde(serialize_with = "serialize_document")]
    pub document: Arc<serde_json::Value>,
    pub layout: Arc<LayoutDocument>,
    /// Seconds since the Unix epoch
    pub updated_at: u64,
}

impl CachedLayout {
    pub fn new(key: CacheKey, document: serde_json::Value, layout: LayoutDocument) -> Self {
        let updated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            key,
            document: Arc::new(document),
            layout: Arc::new(layout),
            updated_at,
        }
    }
}

fn serialize_document<S: serde::Serializer>(
    document: &Arc<serde_json::Value>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    crate::json::serialize_value(document, serializer)
}

pub trait CacheStore: Send {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedLayout>>;
    fn put(&self, entry: CachedLayout) -> Result<()>;
}

/// Process-local store
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<CacheKey, CachedLayout>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedLayout>> {
        let map = self
            .entries
            .lock()
            .map_err(|_| Error::CacheError("cache lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, entry: CachedLayout) -> Result<()> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| Error::CacheError("cache lock poisoned".into()))?;
        map.insert(entry.key.clone(), entry);
        Ok(())
    }
}

/// One JSON file per entry under a directory
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.digest()))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedLayout>> {
        let path = self.path_for(key);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry = match crate::json::from_str::<CachedLayout>(&data) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("ignoring unreadable cache entry {:?}: {}", path, e);
                return Ok(None);
            }
        };
        // digest collisions are not expected, but never serve a foreign entry
        Ok(Some(entry).filter(|e| &e.key == key))
    }

    fn put(&self, entry: CachedLayout) -> Result<()> {
        let path = self.path_for(&entry.key);
        // each writer gets its own temp file; the rename replaces atomically
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, &entry)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| Error::CacheError(format!(
            "failed to store {}: {}",
            path.display(),
            e.error
        )))?;
        Ok(())
    }
}
