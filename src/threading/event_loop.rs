//! Single-thread callback repeater.
//!
//! An [`AsyncEventLoop`] owns a one-worker pool seeded with a single job
//! whose body re-invokes the user callback until the running flag clears.
//! There is no event queue; the callback is the event.

use super::{SharedFlag, WorkerPool};

/// Repeatedly runs a callback on a background thread until stopped.
pub struct AsyncEventLoop {
    running: SharedFlag,
    pool: Option<WorkerPool<()>>,
}

impl AsyncEventLoop {
    /// Start the loop; the callback begins running immediately.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let running = SharedFlag::new(true);
        let loop_flag = running.clone();
        let pool = WorkerPool::with_workers(
            move |_: ()| {
                while loop_flag.get() {
                    callback();
                }
            },
            1,
        );
        pool.submit((), None);
        Self {
            running,
            pool: Some(pool),
        }
    }

    /// Whether the loop is still running.
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop the loop and join the worker. The callback finishes its
    /// current invocation first.
    pub fn stop(&mut self) {
        self.running.set(false);
        if let Some(mut pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}

impl Drop for AsyncEventLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
