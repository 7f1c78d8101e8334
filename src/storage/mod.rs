//! # Storage Engines
//!
//! The persistent layer of the toolkit:
//!
//! - [`kv_engine`]: ordered key-value store over an embedded
//!   log-structured database (sled), with range iteration and chunked
//!   export/import
//! - [`disk_cache`]: directory-scoped wrapper over the engine with an
//!   always-overwrite contract and optional persist-on-drop
//! - [`byte_lru_cache`]: two-tier cache bounded by total byte footprint,
//!   writing dirty entries back to a caller-supplied supplier
//!
//! The engine's directory is the only process-wide mutable state in the
//! crate apart from the lock registry; at most one live engine may hold a
//! directory at a time (sled enforces this with its own lock file).

use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error from the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error surfaced by the embedded database
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    /// A stored record failed to parse
    #[error("corrupt stored data: {0}")]
    Corruption(String),

    /// Insert without overwrite hit an existing key
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    /// Malformed caller input (e.g. an empty key)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

// Module declarations
pub mod byte_lru_cache;
pub mod disk_cache;
pub mod kv_engine;

// Re-exports for convenience
pub use byte_lru_cache::{ByteCacheSupplier, ByteLruCache};
pub use disk_cache::DiskCache;
pub use kv_engine::KvEngine;
