//! # Threading Primitives
//!
//! The concurrency substrate used by the storage and collection layers:
//!
//! - [`generator`]: single-producer/single-consumer bounded handoff with a
//!   dedicated producer thread (lazy sequences)
//! - [`priority_queue`]: thread-safe priority queue with optional
//!   low-priority truncation
//! - [`worker_pool`]: N workers draining the priority queue
//! - [`event_loop`]: one-worker callback repeater with a stop flag
//! - [`lock_registry`]: process-wide named-resource lock manager
//! - [`flag`]: cheaply clonable thread-safe boolean
//!
//! Scheduling is plain OS threads throughout; cancellation is cooperative
//! via flags observed at the blocking points.

use thiserror::Error;

/// Threading error types
#[derive(Debug, Error)]
pub enum ThreadingError {
    /// A producer/consumer handoff was aborted by cancellation
    #[error("handoff aborted by cancellation")]
    Capacity,
}

/// Result type for threading operations
pub type Result<T> = std::result::Result<T, ThreadingError>;

// Module declarations
pub mod event_loop;
pub mod flag;
pub mod generator;
pub mod lock_registry;
pub mod priority_queue;
pub mod worker_pool;

// Re-exports for convenience
pub use event_loop::AsyncEventLoop;
pub use flag::SharedFlag;
pub use generator::{Generator, Yieldable};
pub use priority_queue::PriorityQueue;
pub use worker_pool::WorkerPool;
