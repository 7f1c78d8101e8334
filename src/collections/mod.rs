//! # Ordered Collections
//!
//! Data structures built on the crypto, storage, and threading layers:
//!
//! - [`node`]: the tree-node capability plus the in-memory realization
//! - [`disk_node`]: tree nodes materialized lazily from a disk cache,
//!   turning a tree into a disk-resident index
//! - [`bst`]: binary search tree over a pluggable node allocator with
//!   post-operation balance hooks
//! - [`avl`]: the rotation-based AVL balance policy and tree
//! - [`lru_cache`]: in-memory LRU with write-back to a supplier
//! - [`data_tree`]: append-only versioned DAG with timestamps
//! - [`comparable_string`]: numeric collation over strings
//! - [`signable`]: canonical-hash + stored-signature composition

// Module declarations
pub mod avl;
pub mod bst;
pub mod comparable_string;
pub mod data_tree;
pub mod disk_node;
pub mod lru_cache;
pub mod node;
pub mod signable;

// Re-exports for convenience
pub use avl::AvlTree;
pub use bst::{BalancePolicy, BinarySearchTree};
pub use comparable_string::ComparableString;
pub use data_tree::{DagNode, DataTree};
pub use disk_node::{DiskNode, DiskNodeAllocator};
pub use lru_cache::{CacheSupplier, LruCache};
pub use node::{MemoryNode, MemoryNodeAllocator, NodeAllocator, NodeRef, TreeNode, TreeValue};
pub use signable::{Cacheable, Signable, SignatureRecord};
