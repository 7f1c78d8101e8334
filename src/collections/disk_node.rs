//! Disk-resident tree nodes.
//!
//! A [`DiskNode`] keeps *key strings* instead of owning child pointers:
//! its own key is the stringified value, and the serialized payload is
//! the file-string packing of `[value, height, left_key, right_key]`.
//! Child getters materialize fresh nodes from the shared [`DiskCache`] on
//! demand, and every mutation flushes the node back, so the cache is the
//! single source of truth and a tree survives process restarts.

use std::sync::Arc;

use log::warn;
use parking_lot::Mutex;

use crate::encoding::packing::{self, PackReader};
use crate::storage::{DiskCache, Result as StorageResult};

use super::node::{child_height, NodeAllocator, NodeRef, TreeNode, TreeValue};

/// A tree node persisted in a disk cache.
pub struct DiskNode<T: TreeValue> {
    data: T,
    height: i64,
    left_key: String,
    right_key: String,
    cache: Arc<DiskCache>,
}

impl<T: TreeValue> DiskNode<T> {
    /// Create an empty node bound to a cache.
    pub fn new(cache: Arc<DiskCache>) -> Self {
        Self {
            data: T::default(),
            height: 0,
            left_key: String::new(),
            right_key: String::new(),
            cache,
        }
    }

    /// Materialize the node stored under `key`, if present and parseable.
    pub fn load(cache: &Arc<DiskCache>, key: &str) -> Option<NodeRef<T>> {
        if key.is_empty() {
            return None;
        }
        let payload = cache.get(key)?;
        let mut reader = match PackReader::new(&payload) {
            Ok(reader) => reader,
            Err(e) => {
                warn!("unreadable node record {:?}: {}", key, e);
                return None;
            }
        };
        let data = reader.next_str().ok()?.parse::<T>().ok()?;
        let height = reader.next_str().ok()?.parse::<i64>().ok()?;
        let left_key = reader.next_str().ok()?;
        let right_key = reader.next_str().ok()?;
        Some(Arc::new(Mutex::new(Self {
            data,
            height,
            left_key,
            right_key,
            cache: Arc::clone(cache),
        })))
    }

    fn key(&self) -> String {
        self.data.to_string()
    }

    /// Write this node's record to the cache under its value key.
    fn flush(&self) {
        let key = self.key();
        if key.is_empty() {
            return;
        }
        let payload = packing::pack(&[
            key.as_bytes(),
            self.height.to_string().as_bytes(),
            self.left_key.as_bytes(),
            self.right_key.as_bytes(),
        ]);
        if let Err(e) = self.cache.put(&key, &payload) {
            warn!("failed to flush node {:?}: {}", key, e);
        }
    }

    fn child_key(child: &Option<NodeRef<T>>) -> String {
        child
            .as_ref()
            .map(|node| node.lock().data().to_string())
            .unwrap_or_default()
    }
}

impl<T: TreeValue> TreeNode<T> for DiskNode<T> {
    fn data(&self) -> T {
        self.data.clone()
    }

    fn set_data(&mut self, data: T) {
        self.data = data;
        self.flush();
    }

    fn height(&self) -> i64 {
        self.height
    }

    fn set_height(&mut self, height: i64) {
        self.height = height;
        self.flush();
    }

    fn left(&self) -> Option<NodeRef<T>> {
        Self::load(&self.cache, &self.left_key)
    }

    fn right(&self) -> Option<NodeRef<T>> {
        Self::load(&self.cache, &self.right_key)
    }

    fn set_left(&mut self, child: Option<NodeRef<T>>) {
        let sibling = Self::load(&self.cache, &self.right_key);
        self.height = 1 + child_height(&child).max(child_height(&sibling));
        self.left_key = Self::child_key(&child);
        self.flush();
    }

    fn set_right(&mut self, child: Option<NodeRef<T>>) {
        let sibling = Self::load(&self.cache, &self.left_key);
        self.height = 1 + child_height(&child).max(child_height(&sibling));
        self.right_key = Self::child_key(&child);
        self.flush();
    }

    fn discard(&mut self) {
        let key = self.key();
        if !key.is_empty() {
            self.cache.remove(&key);
        }
    }
}

/// Allocator producing disk-backed nodes over one shared cache.
pub struct DiskNodeAllocator {
    cache: Arc<DiskCache>,
}

impl DiskNodeAllocator {
    /// Create an allocator over a fresh temp-directory cache.
    pub fn new() -> StorageResult<Self> {
        Ok(Self {
            cache: Arc::new(DiskCache::new("bedrock-tree-")?),
        })
    }

    /// Create an allocator with an explicit hot-cache budget.
    pub fn with_cache_size(cache_bytes: u64) -> StorageResult<Self> {
        Ok(Self {
            cache: Arc::new(DiskCache::new_with_cache("bedrock-tree-", cache_bytes)?),
        })
    }

    /// Create an allocator over an existing cache (e.g. a reopened one).
    pub fn with_cache(cache: Arc<DiskCache>) -> Self {
        Self { cache }
    }

    /// The shared cache reference; settings can be adjusted through it
    /// and the same handle reopens a persisted tree later.
    pub fn cache(&self) -> Arc<DiskCache> {
        Arc::clone(&self.cache)
    }

    /// Materialize a persisted node by its value, for re-rooting a tree
    /// whose root key was recorded externally.
    pub fn load_node<T: TreeValue>(&self, value: &T) -> Option<NodeRef<T>> {
        DiskNode::load(&self.cache, &value.to_string())
    }
}

impl<T: TreeValue> NodeAllocator<T> for DiskNodeAllocator {
    fn allocate(&self) -> NodeRef<T> {
        Arc::new(Mutex::new(DiskNode::new(Arc::clone(&self.cache))))
    }
}
