//! In-memory LRU cache with write-back.
//!
//! A fixed-entry-count cache over string keys and shared values, fronted
//! by a caller-supplied [`CacheSupplier`]. Evicting the least-recently-
//! used entry writes it back to the supplier unconditionally; read misses
//! fall through to the supplier and admit what they find. Dropping the
//! cache flushes every entry back, so the supplier is the durable copy.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// The backing store behind an [`LruCache`].
pub trait CacheSupplier<T>: Send {
    /// Store a value; `true` on success.
    fn add(&mut self, key: &str, value: Arc<T>) -> bool;

    /// Fetch a value; `None` on a miss.
    fn get(&mut self, key: &str) -> Option<Arc<T>>;

    /// Remove a value; `true` if something was removed.
    fn remove(&mut self, key: &str) -> bool;
}

/// A countable in-memory LRU cache with supplier write-back.
pub struct LruCache<T> {
    capacity: usize,
    recency: VecDeque<String>,
    entries: HashMap<String, Arc<T>>,
    supplier: Box<dyn CacheSupplier<T>>,
}

impl<T> LruCache<T> {
    /// Default entry-count capacity.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Create a cache with the default capacity.
    pub fn new(supplier: Box<dyn CacheSupplier<T>>) -> Self {
        Self::with_capacity(supplier, Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries.
    pub fn with_capacity(supplier: Box<dyn CacheSupplier<T>>, capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recency: VecDeque::new(),
            entries: HashMap::new(),
            supplier,
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured entry-count capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert a value, re-promoting the key.
    ///
    /// With `write_through`, the value is also forwarded to the supplier
    /// immediately; otherwise it reaches the supplier on eviction or
    /// flush. Empty keys are rejected.
    pub fn insert(&mut self, key: &str, value: Arc<T>, write_through: bool) -> bool {
        if key.is_empty() {
            return false;
        }

        if self.entries.contains_key(key) {
            self.entries.insert(key.to_string(), Arc::clone(&value));
            self.promote(key);
        } else {
            if self.entries.len() >= self.capacity {
                self.evict_lru();
            }
            self.entries.insert(key.to_string(), Arc::clone(&value));
            self.recency.push_front(key.to_string());
        }

        if write_through {
            return self.supplier.add(key, value);
        }
        true
    }

    /// Fetch a value, re-promoting the key on a hit. A miss consults the
    /// supplier and admits any value found.
    pub fn get(&mut self, key: &str) -> Option<Arc<T>> {
        if key.is_empty() {
            return None;
        }
        if let Some(value) = self.entries.get(key).cloned() {
            self.promote(key);
            return Some(value);
        }
        let fetched = self.supplier.get(key)?;
        self.insert(key, Arc::clone(&fetched), false);
        Some(fetched)
    }

    /// Remove an entry locally and from the supplier.
    pub fn remove(&mut self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        if self.entries.remove(key).is_some() {
            self.recency.retain(|queued| queued != key);
        }
        self.supplier.remove(key)
    }

    /// Write every cached entry back to the supplier without evicting.
    pub fn flush_all_back_now(&mut self) -> bool {
        let mut all_ok = true;
        for (key, value) in &self.entries {
            all_ok &= self.supplier.add(key, Arc::clone(value));
        }
        all_ok
    }

    fn promote(&mut self, key: &str) {
        self.recency.retain(|queued| queued != key);
        self.recency.push_front(key.to_string());
    }

    fn evict_lru(&mut self) {
        if let Some(key) = self.recency.pop_back() {
            if let Some(value) = self.entries.remove(&key) {
                // Written back regardless of how it got here.
                self.supplier.add(&key, value);
            }
        }
    }
}

impl<T> Drop for LruCache<T> {
    fn drop(&mut self) {
        self.flush_all_back_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct MapSupplier {
        store: Arc<Mutex<StdHashMap<String, Arc<String>>>>,
    }

    impl CacheSupplier<String> for MapSupplier {
        fn add(&mut self, key: &str, value: Arc<String>) -> bool {
            self.store.lock().unwrap().insert(key.to_string(), value);
            true
        }

        fn get(&mut self, key: &str) -> Option<Arc<String>> {
            self.store.lock().unwrap().get(key).cloned()
        }

        fn remove(&mut self, key: &str) -> bool {
            self.store.lock().unwrap().remove(key).is_some()
        }
    }

    fn value(text: &str) -> Arc<String> {
        Arc::new(text.to_string())
    }

    #[test]
    fn test_eviction_writes_back_to_supplier() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        let mut cache = LruCache::with_capacity(Box::new(supplier), 3);

        for index in 0..5 {
            assert!(cache.insert(&format!("key{}", index), value(&format!("v{}", index)), false));
        }
        assert_eq!(cache.len(), 3);

        // The two oldest keys were evicted and written back.
        let stored = observed.store.lock().unwrap();
        assert_eq!(stored.get("key0").unwrap().as_str(), "v0");
        assert_eq!(stored.get("key1").unwrap().as_str(), "v1");
        assert!(!stored.contains_key("key4"));
    }

    #[test]
    fn test_read_miss_refills_from_supplier() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        let mut cache = LruCache::with_capacity(Box::new(supplier), 2);

        observed
            .store
            .lock()
            .unwrap()
            .insert("cold".into(), value("from supplier"));

        assert_eq!(cache.get("cold").unwrap().as_str(), "from supplier");
        assert_eq!(cache.len(), 1);
        assert!(cache.get("absent").is_none());
    }

    #[test]
    fn test_reads_re_promote() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        let mut cache = LruCache::with_capacity(Box::new(supplier), 2);

        cache.insert("a", value("1"), false);
        cache.insert("b", value("2"), false);
        // Touch "a" so "b" becomes the eviction candidate.
        cache.get("a");
        cache.insert("c", value("3"), false);

        assert!(observed.store.lock().unwrap().contains_key("b"));
        assert!(!observed.store.lock().unwrap().contains_key("a"));
    }

    #[test]
    fn test_write_through() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        let mut cache = LruCache::with_capacity(Box::new(supplier), 4);

        cache.insert("now", value("immediate"), true);
        assert_eq!(
            observed.store.lock().unwrap().get("now").unwrap().as_str(),
            "immediate"
        );
    }

    #[test]
    fn test_remove_hits_both_tiers() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        let mut cache = LruCache::with_capacity(Box::new(supplier), 4);

        cache.insert("gone", value("soon"), true);
        assert!(cache.remove("gone"));
        assert!(cache.get("gone").is_none());
        assert!(!observed.store.lock().unwrap().contains_key("gone"));
        assert!(!cache.remove("gone"));
    }

    #[test]
    fn test_drop_flushes_everything() {
        let supplier = MapSupplier::default();
        let observed = supplier.clone();
        {
            let mut cache = LruCache::with_capacity(Box::new(supplier), 8);
            cache.insert("x", value("1"), false);
            cache.insert("y", value("2"), false);
            assert!(observed.store.lock().unwrap().is_empty());
        }
        let stored = observed.store.lock().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored.get("x").unwrap().as_str(), "1");
    }
}
