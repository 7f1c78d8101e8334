//! Fixed-size worker pool over the priority queue.
//!
//! N workers poll a shared [`PriorityQueue`], sleeping 100 ms when it runs
//! dry. All workers share one user callback and one callback mutex, so
//! callback executions are serialized across the pool; the callback itself
//! need not be re-entrancy safe.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;

use super::{PriorityQueue, SharedFlag};

/// Sleep between polls of an empty queue.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// A pool of worker threads consuming a shared priority queue.
pub struct WorkerPool<T: Send + 'static> {
    queue: Arc<PriorityQueue<T>>,
    running: SharedFlag,
    workers: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Create a pool sized to the machine's available parallelism.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::with_workers(callback, 0)
    }

    /// Create a pool with an explicit worker count (0 = use available
    /// parallelism, falling back to four workers).
    pub fn with_workers<F>(callback: F, worker_count: usize) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let queue = Arc::new(PriorityQueue::unbounded());
        let running = SharedFlag::new(true);
        let callback: Arc<dyn Fn(T) + Send + Sync> = Arc::new(callback);
        let callback_lock = Arc::new(Mutex::new(()));

        let count = if worker_count > 0 {
            worker_count
        } else {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
        };
        debug!("starting worker pool with {} workers", count);

        let workers = (0..count)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let running = running.clone();
                let callback = Arc::clone(&callback);
                let callback_lock = Arc::clone(&callback_lock);
                thread::spawn(move || {
                    while running.get() {
                        match queue.dequeue() {
                            Some(item) => {
                                let _serialized = callback_lock.lock();
                                callback(item);
                            }
                            None => thread::sleep(IDLE_POLL),
                        }
                    }
                })
            })
            .collect();

        Self {
            queue,
            running,
            workers,
        }
    }

    /// Submit work, optionally with a priority.
    pub fn submit(&self, item: T, priority: Option<f64>) {
        self.queue.enqueue(item, priority);
    }

    /// Number of items still waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the pool has been asked to stop.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop the pool: workers finish their current item and exit.
    pub fn shutdown(&mut self) {
        self.running.set(false);
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
