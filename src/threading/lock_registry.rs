//! Named-resource lock manager.
//!
//! A process-wide registry mapping resource names to lock state. The
//! registry is a singleton by construction (module-scoped `OnceCell`);
//! the public surface is free functions plus the RAII [`LockHandle`].
//! Entries track a waiter count and are garbage-collected when released
//! with nobody waiting, so the map only holds contended or held names.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use parking_lot::{Condvar, Mutex};

struct Registry {
    entries: Mutex<HashMap<String, EntryState>>,
    released: Condvar,
}

#[derive(Default)]
struct EntryState {
    locked: bool,
    waiters: usize,
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceCell<Registry> = OnceCell::new();
    REGISTRY.get_or_init(|| Registry {
        entries: Mutex::new(HashMap::new()),
        released: Condvar::new(),
    })
}

/// Acquire the lock for `name`, blocking while another holder has it.
pub fn acquire(name: &str) -> LockHandle {
    let reg = registry();
    let mut entries = reg.entries.lock();
    loop {
        let entry = entries.entry(name.to_string()).or_default();
        if !entry.locked {
            entry.locked = true;
            return LockHandle {
                name: name.to_string(),
                released: false,
            };
        }
        entry.waiters += 1;
        reg.released.wait(&mut entries);
        if let Some(entry) = entries.get_mut(name) {
            entry.waiters -= 1;
        }
    }
}

/// Whether `name` is currently held.
pub fn is_locked(name: &str) -> bool {
    registry()
        .entries
        .lock()
        .get(name)
        .map_or(false, |entry| entry.locked)
}

/// Number of registered lock entries (held or contended).
pub fn registered_count() -> usize {
    registry().entries.lock().len()
}

/// Exclusive ownership of a named lock. Dropping the handle releases it.
#[must_use = "the lock is released as soon as the handle is dropped"]
pub struct LockHandle {
    name: String,
    released: bool,
}

impl LockHandle {
    /// The resource name this handle guards.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Release the lock. A second call is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let reg = registry();
        let mut entries = reg.entries.lock();
        if let Some(entry) = entries.get_mut(&self.name) {
            entry.locked = false;
            if entry.waiters == 0 {
                entries.remove(&self.name);
            }
        }
        reg.released.notify_all();
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        self.release();
    }
}
