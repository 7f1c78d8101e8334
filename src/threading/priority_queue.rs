//! Thread-safe priority queue.
//!
//! Higher priority dequeues first; items enqueued without a priority sort
//! after every prioritized item; ties fall back to insertion order via a
//! monotonic sequence number. An optional maximum size truncates from the
//! low-priority end after each insert.

use std::cmp::Ordering;

use parking_lot::Mutex;

struct Entry<T> {
    item: T,
    priority: Option<f64>,
    sequence: u64,
}

struct QueueState<T> {
    entries: Vec<Entry<T>>,
    next_sequence: u64,
}

/// A mutex-protected priority queue with optional truncation.
pub struct PriorityQueue<T> {
    state: Mutex<QueueState<T>>,
    max_size: usize,
}

impl<T> PriorityQueue<T> {
    /// Create a queue without a size limit.
    pub fn unbounded() -> Self {
        Self::with_max_size(0)
    }

    /// Create a queue keeping at most `max_size` items (0 = no limit).
    ///
    /// When full, the lowest-priority entries are dropped silently.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                entries: Vec::new(),
                next_sequence: 0,
            }),
            max_size,
        }
    }

    /// Enqueue an item, optionally with a priority.
    pub fn enqueue(&self, item: T, priority: Option<f64>) {
        let mut state = self.state.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.entries.push(Entry {
            item,
            priority,
            sequence,
        });
        state.entries.sort_by(rank);
        if self.max_size > 0 && state.entries.len() > self.max_size {
            state.entries.truncate(self.max_size);
        }
    }

    /// Dequeue the highest-priority item, or `None` when empty.
    pub fn dequeue(&self) -> Option<T> {
        let mut state = self.state.lock();
        if state.entries.is_empty() {
            return None;
        }
        Some(state.entries.remove(0).item)
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Drop every queued item.
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

fn rank<T>(a: &Entry<T>, b: &Entry<T>) -> Ordering {
    match (a.priority, b.priority) {
        (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.sequence.cmp(&b.sequence)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.sequence.cmp(&b.sequence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        let queue = PriorityQueue::unbounded();
        queue.enqueue("low", Some(1.0));
        queue.enqueue("high", Some(10.0));
        queue.enqueue("mid", Some(5.0));

        assert_eq!(queue.dequeue(), Some("high"));
        assert_eq!(queue.dequeue(), Some("mid"));
        assert_eq!(queue.dequeue(), Some("low"));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_unprioritized_items_sort_last() {
        let queue = PriorityQueue::unbounded();
        queue.enqueue("first-null", None);
        queue.enqueue("prioritized", Some(0.5));
        queue.enqueue("second-null", None);

        assert_eq!(queue.dequeue(), Some("prioritized"));
        assert_eq!(queue.dequeue(), Some("first-null"));
        assert_eq!(queue.dequeue(), Some("second-null"));
    }

    #[test]
    fn test_fifo_tie_break() {
        let queue = PriorityQueue::unbounded();
        for index in 0..10 {
            queue.enqueue(index, Some(3.0));
        }
        for index in 0..10 {
            assert_eq!(queue.dequeue(), Some(index));
        }
    }

    #[test]
    fn test_max_size_truncates_low_priority() {
        let queue = PriorityQueue::with_max_size(2);
        queue.enqueue("a", Some(1.0));
        queue.enqueue("b", Some(2.0));
        queue.enqueue("c", Some(3.0));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some("c"));
        assert_eq!(queue.dequeue(), Some("b"));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_clear() {
        let queue = PriorityQueue::unbounded();
        queue.enqueue(1, None);
        queue.enqueue(2, None);
        queue.clear();
        assert!(queue.is_empty());
    }
}
