//! Directory-scoped disk cache.
//!
//! A [`DiskCache`] is a [`KvEngine`] with cache semantics: string keys,
//! writes always overwrite, and reads simply miss instead of erroring.
//! The backing directory is either caller-named (so the cache can be
//! reopened later) or auto-generated under the OS temp directory with a
//! caller-chosen prefix. Unless told to persist, dropping the cache
//! deletes the directory.

use std::path::{Path, PathBuf};

use log::warn;
use uuid::Uuid;

use super::{KvEngine, Result};

/// A key-value cache bound to a directory on disk.
pub struct DiskCache {
    engine: Option<KvEngine>,
    dir: PathBuf,
    persist: bool,
}

impl DiskCache {
    /// Create a cache in a fresh directory under the OS temp dir.
    pub fn new(prefix: &str) -> Result<Self> {
        Self::new_with_cache(prefix, KvEngine::DEFAULT_CACHE_SIZE)
    }

    /// Create a temp-directory cache with an explicit backend cache size.
    pub fn new_with_cache(prefix: &str, cache_bytes: u64) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("{}{}", prefix, Uuid::new_v4()));
        Self::open_with_cache(dir, cache_bytes)
    }

    /// Open a cache at an explicit directory, restoring any key space a
    /// previous persisting instance left there.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_cache(dir, KvEngine::DEFAULT_CACHE_SIZE)
    }

    /// Open a cache at an explicit directory with an explicit backend
    /// cache size.
    pub fn open_with_cache(dir: impl AsRef<Path>, cache_bytes: u64) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let engine = KvEngine::open_with_cache(&dir, false, cache_bytes)?;
        Ok(Self {
            engine: Some(engine),
            dir,
            persist: false,
        })
    }

    /// The directory backing this cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keep the backing directory when this instance is dropped.
    pub fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }

    /// The underlying storage engine.
    pub fn engine(&self) -> &KvEngine {
        self.engine.as_ref().expect("engine alive until drop")
    }

    /// Store a value, overwriting any existing entry.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.engine().insert(key.as_bytes(), value, true)
    }

    /// Fetch a value; `None` on a miss.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.engine().get(key.as_bytes()) {
            Ok(value) => value,
            Err(e) => {
                warn!("disk cache read of {:?} failed: {}", key, e);
                None
            }
        }
    }

    /// Remove an entry; `false` when it was absent.
    pub fn remove(&self, key: &str) -> bool {
        self.engine().remove(key.as_bytes()).unwrap_or(false)
    }
}

impl Drop for DiskCache {
    fn drop(&mut self) {
        if self.persist {
            return;
        }
        if let Some(engine) = self.engine.take() {
            if let Err(e) = engine.destroy() {
                warn!("failed to remove cache directory {:?}: {}", self.dir, e);
            }
        }
    }
}
