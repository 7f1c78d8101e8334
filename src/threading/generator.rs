//! Generator: producer/consumer bounded handoff.
//!
//! A [`Generator`] runs a producer closure on its own thread and hands
//! items to the consuming side through a [`Yieldable`] channel with a
//! two-item buffer. Producers block once two items are pending; consumers
//! wake them as items are taken. Completion is idempotent and doubles as
//! the cancellation signal: a cancelled producer sees its next
//! [`Yieldable::yield_item`] fail and is expected to bail out promptly.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};

use super::{Result, ThreadingError};

/// Maximum number of items buffered between producer and consumer.
const HANDOFF_DEPTH: usize = 2;

struct ChannelState<T> {
    queue: VecDeque<T>,
    done: bool,
}

/// The producer-facing side of a generator's handoff channel.
pub struct Yieldable<T> {
    state: Mutex<ChannelState<T>>,
    produced: Condvar,
    consumed: Condvar,
}

impl<T> Yieldable<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(ChannelState {
                queue: VecDeque::new(),
                done: false,
            }),
            produced: Condvar::new(),
            consumed: Condvar::new(),
        }
    }

    /// Hand one item to the consumer, blocking while the buffer is full.
    ///
    /// Fails with [`ThreadingError::Capacity`] once the channel has been
    /// completed; producers should treat that as the signal to stop.
    pub fn yield_item(&self, item: T) -> Result<()> {
        let mut state = self.state.lock();
        while state.queue.len() >= HANDOFF_DEPTH && !state.done {
            self.consumed.wait(&mut state);
        }
        if state.done {
            return Err(ThreadingError::Capacity);
        }
        state.queue.push_back(item);
        self.produced.notify_one();
        Ok(())
    }

    /// Mark the stream complete. Idempotent; wakes both sides.
    pub fn complete(&self) {
        let mut state = self.state.lock();
        if !state.done {
            state.done = true;
            self.produced.notify_all();
            self.consumed.notify_all();
        }
    }

    /// Whether the channel has been completed (items may still be queued).
    pub fn is_terminated(&self) -> bool {
        self.state.lock().done
    }

    fn wait_has_more(&self) -> bool {
        let mut state = self.state.lock();
        while state.queue.is_empty() && !state.done {
            self.produced.wait(&mut state);
        }
        !state.queue.is_empty()
    }

    fn take_item(&self) -> Option<T> {
        let mut state = self.state.lock();
        while state.queue.is_empty() && !state.done {
            self.produced.wait(&mut state);
        }
        let item = state.queue.pop_front();
        if item.is_some() {
            self.consumed.notify_one();
        }
        item
    }
}

/// A lazy, finite, non-restartable sequence fed by a background producer.
pub struct Generator<T> {
    channel: Arc<Yieldable<T>>,
    producer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Generator<T> {
    /// Spawn the producer thread and return the consuming handle.
    ///
    /// The channel is completed automatically when the producer closure
    /// returns, so producers only call [`Yieldable::complete`] themselves
    /// to end the stream early.
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(&Yieldable<T>) + Send + 'static,
    {
        let channel = Arc::new(Yieldable::new());
        let producer_channel = Arc::clone(&channel);
        let handle = thread::spawn(move || {
            producer(&producer_channel);
            producer_channel.complete();
        });
        Self {
            channel,
            producer: Some(handle),
        }
    }
}

impl<T> Generator<T> {
    /// Whether another item will be produced. Blocks until an item is
    /// queued or the stream completes.
    pub fn has_more(&self) -> bool {
        self.channel.wait_has_more()
    }

    /// Take the next item; `None` once the stream is complete and drained.
    pub fn next_item(&self) -> Option<T> {
        self.channel.take_item()
    }

    /// Cancel the stream: completes the channel, discarding anything the
    /// producer has not yet handed over.
    pub fn quit_remaining(&self) {
        self.channel.complete();
    }
}

impl<T> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.next_item()
    }
}

impl<T> Drop for Generator<T> {
    fn drop(&mut self) {
        self.channel.complete();
        if let Some(handle) = self.producer.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_produces_in_order() {
        let generator = Generator::new(|yielder| {
            for value in 0..100 {
                if yielder.yield_item(value).is_err() {
                    return;
                }
            }
        });

        let collected: Vec<i32> = generator.collect();
        assert_eq!(collected, (0..100).collect::<Vec<i32>>());
    }

    #[test]
    fn test_has_more_and_next_item() {
        let generator = Generator::new(|yielder| {
            let _ = yielder.yield_item(41);
            let _ = yielder.yield_item(42);
        });

        let mut sum = 0;
        while generator.has_more() {
            sum += generator.next_item().unwrap();
        }
        assert_eq!(sum, 83);
        assert!(generator.next_item().is_none());
    }

    #[test]
    fn test_empty_producer() {
        let generator: Generator<i32> = Generator::new(|_| {});
        assert!(!generator.has_more());
        assert!(generator.next_item().is_none());
    }

    #[test]
    fn test_backpressure_blocks_producer() {
        let generator = Generator::new(|yielder| {
            // Unbuffered flood; backpressure keeps at most two pending.
            for value in 0..10_000u32 {
                if yielder.yield_item(value).is_err() {
                    return;
                }
            }
        });

        std::thread::sleep(Duration::from_millis(50));
        let mut count = 0u32;
        for (expected, value) in generator.enumerate() {
            assert_eq!(expected as u32, value);
            count += 1;
        }
        assert_eq!(count, 10_000);
    }

    #[test]
    fn test_early_consumer_exit_stops_producer() {
        let generator = Generator::new(|yielder| {
            for value in 0..10_000u64 {
                std::thread::sleep(Duration::from_millis(1));
                if yielder.yield_item(value).is_err() {
                    return;
                }
            }
        });

        let mut sum = 0u64;
        while generator.has_more() {
            sum += generator.next_item().unwrap();
            if sum >= 500 {
                break;
            }
        }
        assert_eq!(sum, 528);

        let started = Instant::now();
        generator.quit_remaining();
        drop(generator);
        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[test]
    fn test_complete_is_idempotent() {
        let generator = Generator::new(|yielder| {
            let _ = yielder.yield_item(1);
        });
        generator.quit_remaining();
        generator.quit_remaining();
        // Queue may still hold the first item or not, but the stream must
        // terminate either way.
        while generator.has_more() {
            generator.next_item();
        }
    }
}
