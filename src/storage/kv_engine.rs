//! Ordered key-value storage engine.
//!
//! A thin, opinionated layer over sled: byte keys to byte values in
//! lexicographic order, point operations with explicit overwrite control,
//! lazy key iterators in either direction, and a chunked export/import
//! stream for rebuilding an engine elsewhere. The file layout inside the
//! directory belongs to sled and is treated as opaque.
//!
//! An engine-level reentrant mutex serializes the public operations so
//! read-modify-write pairs observe a consistent view; sled handles its own
//! internal concurrency underneath.

use std::path::{Path, PathBuf};

use log::debug;
use parking_lot::ReentrantMutex;

use crate::encoding::packing;
use crate::threading::Generator;

use super::{Result, StorageError};

/// Separator between records inside an export chunk.
const RECORD_SEPARATOR: u8 = b'~';

/// An ordered, persistent mapping from byte keys to byte values.
pub struct KvEngine {
    db: sled::Db,
    dir: PathBuf,
    mutex: ReentrantMutex<()>,
}

impl KvEngine {
    /// Default backend cache size in bytes (100 MiB).
    pub const DEFAULT_CACHE_SIZE: u64 = 100 * 1024 * 1024;

    /// Open (or create) an engine rooted at `dir`. With `recreate`, any
    /// existing directory contents are deleted first.
    pub fn open(dir: impl AsRef<Path>, recreate: bool) -> Result<Self> {
        Self::open_with_cache(dir, recreate, Self::DEFAULT_CACHE_SIZE)
    }

    /// Open an engine with an explicit backend cache size.
    pub fn open_with_cache(
        dir: impl AsRef<Path>,
        recreate: bool,
        cache_bytes: u64,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if recreate && dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        let db = sled::Config::new()
            .path(&dir)
            .cache_capacity(cache_bytes)
            .open()?;
        debug!("opened kv engine at {:?} (recreate={})", dir, recreate);
        Ok(Self {
            db,
            dir,
            mutex: ReentrantMutex::new(()),
        })
    }

    /// The directory backing this engine.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Insert a key-value pair.
    ///
    /// An empty key is rejected with `InvalidInput`. An existing key
    /// without `overwrite` fails with `AlreadyExists`; with `overwrite`
    /// the delete-then-put is applied as one atomic batch.
    pub fn insert(&self, key: &[u8], value: &[u8], overwrite: bool) -> Result<()> {
        let _serialized = self.mutex.lock();
        if key.is_empty() {
            return Err(StorageError::InvalidInput("empty key".into()));
        }
        let exists = self.db.contains_key(key)?;
        if exists && !overwrite {
            return Err(StorageError::AlreadyExists(
                String::from_utf8_lossy(key).into_owned(),
            ));
        }
        let mut batch = sled::Batch::default();
        if exists {
            batch.remove(key);
        }
        batch.insert(key, value);
        self.db.apply_batch(batch)?;
        Ok(())
    }

    /// Read a value, `None` when the key is absent or empty.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let _serialized = self.mutex.lock();
        if key.is_empty() {
            return Ok(None);
        }
        Ok(self.db.get(key)?.map(|value| value.to_vec()))
    }

    /// Read a value, falling back to `default` when the key is absent.
    pub fn get_or(&self, key: &[u8], default: &[u8]) -> Result<Vec<u8>> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_vec()))
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        let _serialized = self.mutex.lock();
        if key.is_empty() {
            return Ok(false);
        }
        Ok(self.db.contains_key(key)?)
    }

    /// Delete a key; `Ok(false)` when it was absent.
    pub fn remove(&self, key: &[u8]) -> Result<bool> {
        let _serialized = self.mutex.lock();
        if key.is_empty() {
            return Ok(false);
        }
        if !self.db.contains_key(key)? {
            return Ok(false);
        }
        let mut batch = sled::Batch::default();
        batch.remove(key);
        self.db.apply_batch(batch)?;
        Ok(true)
    }

    /// The lexicographically first key, if any.
    pub fn first_key(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.db.first()?.map(|(key, _)| key.to_vec()))
    }

    /// The lexicographically last key, if any.
    pub fn last_key(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.db.last()?.map(|(key, _)| key.to_vec()))
    }

    /// Lazy forward iterator over keys, starting at `ref_key` (inclusive
    /// when present) and walking upward in lexicographic order.
    pub fn keys_from(&self, ref_key: &[u8]) -> Generator<Vec<u8>> {
        let db = self.db.clone();
        let start = ref_key.to_vec();
        Generator::new(move |yielder| {
            for entry in db.range(start..) {
                let Ok((key, _)) = entry else { break };
                if yielder.yield_item(key.to_vec()).is_err() {
                    return;
                }
            }
        })
    }

    /// Lazy backward iterator over keys, starting at `ref_key` (inclusive
    /// when present) and walking downward in lexicographic order.
    pub fn keys_back_from(&self, ref_key: &[u8]) -> Generator<Vec<u8>> {
        let db = self.db.clone();
        let start = ref_key.to_vec();
        Generator::new(move |yielder| {
            for entry in db.range(..=start).rev() {
                let Ok((key, _)) = entry else { break };
                if yielder.yield_item(key.to_vec()).is_err() {
                    return;
                }
            }
        })
    }

    /// Stream the engine's full contents as opaque chunks.
    ///
    /// Each record is the file-string packing of `[key, value]`; records
    /// within a chunk are separated by `~`. A record bigger than
    /// `chunk_size` is emitted alone as its own chunk. Importing the
    /// stream into an empty engine reproduces this engine's state.
    pub fn chunked_export(&self, chunk_size: usize) -> Generator<Vec<u8>> {
        let db = self.db.clone();
        Generator::new(move |yielder| {
            let mut chunk: Vec<u8> = Vec::with_capacity(chunk_size);
            for entry in db.iter() {
                let Ok((key, value)) = entry else { break };
                let record = packing::pack(&[key.as_ref(), value.as_ref()]);

                if record.len() > chunk_size {
                    // Oversize records travel alone, without a separator.
                    if yielder.yield_item(record).is_err() {
                        return;
                    }
                    continue;
                }
                if !chunk.is_empty() && chunk.len() + record.len() >= chunk_size {
                    if yielder.yield_item(std::mem::take(&mut chunk)).is_err() {
                        return;
                    }
                }
                chunk.extend_from_slice(&record);
                chunk.push(RECORD_SEPARATOR);
            }
            if !chunk.is_empty() {
                let _ = yielder.yield_item(chunk);
            }
        })
    }

    /// Import a chunk stream produced by [`chunked_export`](Self::chunked_export),
    /// overwriting any colliding keys.
    ///
    /// Records are self-describing, so the parser consumes one record at a
    /// time and only treats `~` as a separator between records.
    pub fn chunked_import(&self, chunks: Generator<Vec<u8>>) -> Result<()> {
        for chunk in chunks {
            let mut position = 0usize;
            while position < chunk.len() {
                if chunk[position] == RECORD_SEPARATOR {
                    position += 1;
                    continue;
                }
                let (parts, consumed) = packing::unpack_prefix(&chunk[position..])
                    .map_err(|e| StorageError::Corruption(e.to_string()))?;
                if parts.len() < 2 {
                    return Err(StorageError::Corruption(
                        "chunk record is missing its key or value".into(),
                    ));
                }
                self.insert(&parts[0], &parts[1], true)?;
                position += consumed;
            }
        }
        debug!("chunked import into {:?} complete", self.dir);
        Ok(())
    }

    /// Close the engine and delete its directory.
    pub fn destroy(self) -> Result<()> {
        let dir = self.dir.clone();
        drop(self.db);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        debug!("destroyed kv engine at {:?}", dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bedrock-kv-{}-{}", tag, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_insert_get_delete() {
        let dir = scratch_dir("basic");
        let engine = KvEngine::open(&dir, false).unwrap();

        engine.insert(b"Key1", b"Value1", false).unwrap();
        assert_eq!(engine.get(b"Key1").unwrap().unwrap(), b"Value1");
        assert_eq!(engine.get_or(b"missing", b"fallback").unwrap(), b"fallback");
        assert!(engine.contains(b"Key1").unwrap());

        assert!(engine.remove(b"Key1").unwrap());
        assert!(!engine.remove(b"Key1").unwrap());
        assert_eq!(engine.get(b"Key1").unwrap(), None);

        engine.destroy().unwrap();
    }

    #[test]
    fn test_overwrite_control() {
        let dir = scratch_dir("overwrite");
        let engine = KvEngine::open(&dir, false).unwrap();

        engine.insert(b"key", b"first", false).unwrap();
        assert!(matches!(
            engine.insert(b"key", b"second", false),
            Err(StorageError::AlreadyExists(_))
        ));
        assert_eq!(engine.get(b"key").unwrap().unwrap(), b"first");

        engine.insert(b"key", b"second", true).unwrap();
        assert_eq!(engine.get(b"key").unwrap().unwrap(), b"second");

        assert!(matches!(
            engine.insert(b"", b"value", false),
            Err(StorageError::InvalidInput(_))
        ));

        engine.destroy().unwrap();
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = scratch_dir("reopen");
        {
            let engine = KvEngine::open(&dir, false).unwrap();
            engine.insert(b"durable", b"yes", false).unwrap();
        }
        {
            let engine = KvEngine::open(&dir, false).unwrap();
            assert_eq!(engine.get(b"durable").unwrap().unwrap(), b"yes");
            engine.destroy().unwrap();
        }
    }

    #[test]
    fn test_recreate_wipes_directory() {
        let dir = scratch_dir("recreate");
        {
            let engine = KvEngine::open(&dir, false).unwrap();
            engine.insert(b"stale", b"data", false).unwrap();
        }
        let engine = KvEngine::open(&dir, true).unwrap();
        assert_eq!(engine.get(b"stale").unwrap(), None);
        engine.destroy().unwrap();
    }

    #[test]
    fn test_forward_and_backward_iteration() {
        let dir = scratch_dir("iter");
        let engine = KvEngine::open(&dir, false).unwrap();
        for key in ["a", "b", "c", "d", "e"] {
            engine.insert(key.as_bytes(), b"v", false).unwrap();
        }

        let first = engine.first_key().unwrap().unwrap();
        let forward: Vec<Vec<u8>> = engine.keys_from(&first).collect();
        assert_eq!(forward, vec![b"a", b"b", b"c", b"d", b"e"]);

        let last = engine.last_key().unwrap().unwrap();
        let backward: Vec<Vec<u8>> = engine.keys_back_from(&last).collect();
        assert_eq!(backward, vec![b"e", b"d", b"c", b"b", b"a"]);

        // Mid-key starts are inclusive.
        let from_mid: Vec<Vec<u8>> = engine.keys_from(b"c").collect();
        assert_eq!(from_mid, vec![b"c", b"d", b"e"]);
        let back_from_mid: Vec<Vec<u8>> = engine.keys_back_from(b"c").collect();
        assert_eq!(back_from_mid, vec![b"c", b"b", b"a"]);

        engine.destroy().unwrap();
    }

    #[test]
    fn test_chunked_round_trip() {
        let source_dir = scratch_dir("export");
        let target_dir = scratch_dir("import");
        let source = KvEngine::open(&source_dir, false).unwrap();
        let target = KvEngine::open(&target_dir, false).unwrap();

        for index in 0..200u32 {
            let key = format!("key-{:04}", index);
            let value = format!("value-{}", index).repeat(4);
            source.insert(key.as_bytes(), value.as_bytes(), false).unwrap();
        }

        target.chunked_import(source.chunked_export(256)).unwrap();
        for index in 0..200u32 {
            let key = format!("key-{:04}", index);
            let expected = format!("value-{}", index).repeat(4);
            assert_eq!(
                target.get(key.as_bytes()).unwrap().unwrap(),
                expected.as_bytes()
            );
        }

        source.destroy().unwrap();
        target.destroy().unwrap();
    }

    #[test]
    fn test_chunked_round_trip_oversize_records() {
        let source_dir = scratch_dir("export-big");
        let target_dir = scratch_dir("import-big");
        let source = KvEngine::open(&source_dir, false).unwrap();
        let target = KvEngine::open(&target_dir, false).unwrap();

        // One record far larger than the chunk size, plus a value that
        // contains the separator byte itself.
        let big = vec![b'x'; 4096];
        source.insert(b"big", &big, false).unwrap();
        source.insert(b"tilde", b"a~b~c", false).unwrap();

        target.chunked_import(source.chunked_export(64)).unwrap();
        assert_eq!(target.get(b"big").unwrap().unwrap(), big);
        assert_eq!(target.get(b"tilde").unwrap().unwrap(), b"a~b~c");

        source.destroy().unwrap();
        target.destroy().unwrap();
    }
}
