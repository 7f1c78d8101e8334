//! # Bedrock - Distributed Data Systems Toolkit
//!
//! A core toolkit for building distributed, cryptographically
//! authenticated data systems in Rust.
//!
//! ## Architecture
//!
//! - `crypto`: hashing, proof-of-work, digital signatures (ECDSA and
//!   Winternitz), and symmetric encryption
//! - `encoding`: Base64/hex codecs and the canonical file-string packing
//! - `threading`: generators, priority queue, worker pool, event loop,
//!   and the named-lock registry
//! - `storage`: the sled-backed ordered key-value engine, disk cache,
//!   and byte-budgeted LRU cache
//! - `collections`: BST/AVL trees over pluggable (memory or disk) node
//!   storage, in-memory LRU, the versioned data tree, numeric string
//!   collation, and signable records
//!
//! Authenticated records are produced by combining `crypto` and
//! `encoding` through `collections::signable`, stored through `storage`,
//! indexed by `collections` trees whose nodes may live in the same disk
//! cache, and coordinated by the `threading` primitives.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Cryptographic services
pub mod crypto;

// Text and binary codecs
pub mod encoding;

// Concurrency primitives
pub mod threading;

// Persistent storage engines
pub mod storage;

// Ordered collections and signable records
pub mod collections;

// Re-export commonly used types
pub use collections::{
    AvlTree, BinarySearchTree, Cacheable, ComparableString, DataTree, DiskNodeAllocator, LruCache,
    Signable, SignatureRecord,
};
pub use crypto::{AesKey, CryptoError, KeyType, SigningKeyPair};
pub use encoding::CodecError;
pub use storage::{ByteLruCache, DiskCache, KvEngine, StorageError};
pub use threading::{AsyncEventLoop, Generator, PriorityQueue, SharedFlag, WorkerPool};

/// Re-export version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
