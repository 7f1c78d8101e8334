//! Thread-safe boolean flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply clonable thread-safe boolean.
///
/// Clones share the same underlying value; the worker pool and event loop
/// use one as their run/stop signal.
#[derive(Clone, Debug, Default)]
pub struct SharedFlag {
    value: Arc<AtomicBool>,
}

impl SharedFlag {
    /// Create a flag with the given initial value.
    pub fn new(value: bool) -> Self {
        Self {
            value: Arc::new(AtomicBool::new(value)),
        }
    }

    /// Read the current value.
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    /// Set a new value, visible to all clones.
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_set_and_get() {
        let flag = SharedFlag::new(false);
        assert!(!flag.get());
        flag.set(true);
        assert!(flag.get());
        flag.set(false);
        assert!(!flag.get());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = SharedFlag::new(false);
        let clone = flag.clone();
        clone.set(true);
        assert!(flag.get());
    }

    #[test]
    fn test_visible_across_threads() {
        let flag = SharedFlag::new(false);
        let clone = flag.clone();
        let handle = std::thread::spawn(move || clone.set(true));
        handle.join().unwrap();
        assert!(flag.get());
    }
}
