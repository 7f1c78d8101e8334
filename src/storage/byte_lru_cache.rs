//! Byte-budgeted two-tier LRU cache.
//!
//! The hot tier is a private [`DiskCache`]; a metadata list tracks each
//! entry's key, dirty flag, byte size, and a monotonically issued
//! last-used index. Capacity is a byte budget: inserts evict the
//! least-recently-used entries until the incoming item fits, and an item
//! larger than the whole budget is still accepted after a full drain.
//! Dirty entries are written back to the caller-supplied supplier when
//! evicted or on an explicit flush.

use super::{DiskCache, Result};

/// The backing store behind a [`ByteLruCache`].
pub trait ByteCacheSupplier: Send {
    /// Store a value; `true` on success.
    fn add(&mut self, key: &str, value: &[u8]) -> bool;

    /// Fetch a value; `None` or empty means a miss.
    fn get(&mut self, key: &str) -> Option<Vec<u8>>;

    /// Remove a value; `true` if something was removed.
    fn remove(&mut self, key: &str) -> bool;
}

struct EntryMeta {
    key: String,
    dirty: bool,
    size: u64,
    last_used: u64,
}

/// A disk-bounded LRU cache that evicts by total byte footprint.
pub struct ByteLruCache {
    capacity: u64,
    next_use: u64,
    hot: DiskCache,
    entries: Vec<EntryMeta>,
    supplier: Box<dyn ByteCacheSupplier>,
}

impl ByteLruCache {
    /// Create a cache holding at most `capacity_bytes` of values.
    pub fn new(supplier: Box<dyn ByteCacheSupplier>, capacity_bytes: u64) -> Result<Self> {
        Self::with_hot_cache_size(supplier, capacity_bytes, crate::storage::KvEngine::DEFAULT_CACHE_SIZE)
    }

    /// Create a cache with an explicit hot-tier backend cache size.
    pub fn with_hot_cache_size(
        supplier: Box<dyn ByteCacheSupplier>,
        capacity_bytes: u64,
        hot_cache_bytes: u64,
    ) -> Result<Self> {
        Ok(Self {
            capacity: capacity_bytes,
            next_use: 0,
            hot: DiskCache::new_with_cache("bedrock-bytelru-", hot_cache_bytes)?,
            entries: Vec::new(),
            supplier,
        })
    }

    /// The configured byte budget.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Total bytes currently accounted to cached values.
    pub fn len_bytes(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    /// Insert a value.
    ///
    /// With `write_through` the value is also forwarded to the supplier
    /// immediately and the entry starts clean; otherwise it starts dirty
    /// and reaches the supplier only on eviction or flush.
    pub fn insert(&mut self, key: &str, value: &[u8], write_through: bool) -> bool {
        // Re-inserting retires the old record first (write-back if dirty),
        // since the new value may have a different size.
        if self.get(key).is_some() {
            if let Some(index) = self.index_of(key) {
                if !self.retire(index) {
                    return false;
                }
            }
        }

        self.make_room(value.len() as u64);
        if self.hot.put(key, value).is_err() {
            return false;
        }

        let wrote_back = write_through && self.supplier.add(key, value);
        let last_used = self.bump_use();
        self.entries.push(EntryMeta {
            key: key.to_string(),
            dirty: !wrote_back,
            size: value.len() as u64,
            last_used,
        });
        true
    }

    /// Fetch a value; a miss consults the supplier and admits any
    /// non-empty result to the hot tier as a clean entry.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        if self.index_of(key).is_none() {
            if let Some(value) = self.supplier.get(key).filter(|value| !value.is_empty()) {
                self.make_room(value.len() as u64);
                if self.hot.put(key, &value).is_ok() {
                    let last_used = self.bump_use();
                    self.entries.push(EntryMeta {
                        key: key.to_string(),
                        dirty: false,
                        size: value.len() as u64,
                        last_used,
                    });
                }
            }
        }
        self.hot.get(key)
    }

    /// Remove a key from the cache and tombstone the supplier copy.
    ///
    /// Returns `true` if any tier actually removed something.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed_meta = match self.index_of(key) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        };
        let removed_hot = self.hot.remove(key);
        let removed_supplier = self.supplier.remove(key);
        removed_meta || removed_hot || removed_supplier
    }

    /// Write every dirty entry back to the supplier now, marking the
    /// written entries clean. Returns `false` if any write-back failed.
    pub fn flush_all_back_now(&mut self) -> bool {
        let mut all_ok = true;
        for index in 0..self.entries.len() {
            if !self.entries[index].dirty {
                continue;
            }
            let key = self.entries[index].key.clone();
            let content = self.hot.get(&key).unwrap_or_default();
            if self.supplier.add(&key, &content) {
                self.entries[index].dirty = false;
            } else {
                all_ok = false;
            }
        }
        all_ok
    }

    fn bump_use(&mut self) -> u64 {
        let issued = self.next_use;
        self.next_use += 1;
        issued
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    fn make_room(&mut self, incoming: u64) {
        while self.len_bytes() + incoming > self.capacity {
            if !self.evict_lru() {
                break;
            }
        }
    }

    fn evict_lru(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(index, _)| index);
        match oldest {
            Some(index) => self.retire(index),
            None => false,
        }
    }

    /// Drop one entry from the metadata and hot tier, writing it back to
    /// the supplier first when dirty.
    fn retire(&mut self, index: usize) -> bool {
        let entry = self.entries.swap_remove(index);
        let content = self.hot.get(&entry.key).unwrap_or_default();
        if entry.dirty && !self.supplier.add(&entry.key, &content) {
            return false;
        }
        self.hot.remove(&entry.key);
        true
    }
}
