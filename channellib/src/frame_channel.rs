//! Bounded, drop-oldest handoff queue (spec component 4.A).
//!
//! A camera producer must never stall: if the queue is full, `push`
//! atomically discards the oldest element and enqueues the new one. The
//! eviction and the enqueue happen inside a single lock acquisition, which
//! is the fix the design notes call for over the naive
//! `get_nowait`-then-`put_nowait` pattern (that sequence has a window
//! between the two calls in which another producer or a `close()` can run,
//! occasionally leaving the queue transiently under-full).

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;

struct Shared<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
}

struct State<T> {
    queue: VecDeque<T>,
    capacity: usize,
    closed: bool,
    dropped: u64,
    delivered: u64,
    pushed: u64,
}

/// The producer half of a [`frame_channel`].
pub struct FrameSender<T> {
    shared: Arc<Shared<T>>,
}

/// The consumer half of a [`frame_channel`].
pub struct FrameReceiver<T> {
    shared: Arc<Shared<T>>,
}

/// Create a bounded drop-oldest channel of capacity `capacity` (must be
/// at least 1).
pub fn frame_channel<T>(capacity: usize) -> (FrameSender<T>, FrameReceiver<T>) {
    assert!(capacity >= 1, "frame channel capacity must be at least 1");
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            queue: VecDeque::with_capacity(capacity),
            capacity,
            closed: false,
            dropped: 0,
            delivered: 0,
            pushed: 0,
        }),
        not_empty: Condvar::new(),
    });
    (
        FrameSender {
            shared: shared.clone(),
        },
        FrameReceiver { shared },
    )
}

impl<T> FrameSender<T> {
    /// Enqueue `item`. Never blocks. If the queue is already at capacity,
    /// the oldest queued item is discarded (and counted as a drop event)
    /// before `item` is enqueued. Returns `true` if an item was dropped to
    /// make room.
    pub fn push(&self, item: T) -> bool {
        let mut state = self.shared.state.lock();
        state.pushed += 1;
        let dropped = if state.queue.len() >= state.capacity {
            state.queue.pop_front();
            state.dropped += 1;
            true
        } else {
            false
        };
        state.queue.push_back(item);
        self.shared.not_empty.notify_one();
        dropped
    }

    /// Total number of items dropped to make room, since creation.
    pub fn dropped_count(&self) -> u64 {
        self.shared.state.lock().dropped
    }

    /// Total number of items ever pushed (dropped + delivered + currently
    /// queued), since creation. Useful for the `dropped + delivered ==
    /// pushed` accounting invariant.
    pub fn pushed_count(&self) -> u64 {
        self.shared.state.lock().pushed
    }

    /// Wake any blocked consumer and mark the channel closed. Subsequent
    /// `pop()` calls drain whatever remains queued, then return `None`
    /// forever after.
    pub fn close(&self) {
        let mut state = self.shared.state.lock();
        state.closed = true;
        self.shared.not_empty.notify_all();
    }
}

impl<T> Clone for FrameSender<T> {
    fn clone(&self) -> Self {
        FrameSender {
            shared: self.shared.clone(),
        }
    }
}

impl<T> FrameReceiver<T> {
    /// Block until an item is available, returning the oldest queued item.
    /// Returns `None` once the channel is closed and drained — the
    /// end-of-stream sentinel.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        loop {
            if let Some(item) = state.queue.pop_front() {
                state.delivered += 1;
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.shared.not_empty.wait(&mut state);
        }
    }

    /// Non-blocking variant of [`Self::pop`]: returns `None` immediately
    /// if nothing is queued, regardless of whether the channel is closed.
    pub fn try_pop(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        let item = state.queue.pop_front();
        if item.is_some() {
            state.delivered += 1;
        }
        item
    }

    /// Total number of items delivered to a consumer, since creation.
    pub fn delivered_count(&self) -> u64 {
        self.shared.state.lock().delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn drop_oldest_keeps_newest() {
        let (tx, rx) = frame_channel::<i32>(1);
        assert!(!tx.push(1));
        assert!(tx.push(2)); // 1 is evicted
        assert_eq!(rx.pop(), Some(2));
    }

    #[test]
    fn capacity_of_four_buffers_without_dropping() {
        let (tx, rx) = frame_channel::<i32>(4);
        for i in 0..4 {
            assert!(!tx.push(i));
        }
        for i in 0..4 {
            assert_eq!(rx.pop(), Some(i));
        }
    }

    #[test]
    fn close_wakes_blocked_consumer() {
        let (tx, rx) = frame_channel::<i32>(1);
        let handle = std::thread::spawn(move || rx.pop());
        std::thread::sleep(Duration::from_millis(20));
        tx.close();
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn close_drains_remaining_before_sentinel() {
        let (tx, rx) = frame_channel::<i32>(4);
        tx.push(1);
        tx.push(2);
        tx.close();
        assert_eq!(rx.pop(), Some(1));
        assert_eq!(rx.pop(), Some(2));
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn accounting_invariant_holds() {
        // count(dropped) + count(delivered) <= count(pushed), and the
        // remainder is exactly what's left queued.
        let (tx, rx) = frame_channel::<i32>(1);
        for i in 0..100 {
            tx.push(i);
        }
        let mut delivered = 0u64;
        while rx.try_pop().is_some() {
            delivered += 1;
        }
        assert_eq!(tx.dropped_count() + delivered, tx.pushed_count());
    }

    #[test]
    fn slow_consumer_sees_monotonic_timestamps() {
        let (tx, rx) = frame_channel::<u64>(1);
        for t in 0..50u64 {
            tx.push(t);
        }
        let mut last = None;
        while let Some(t) = rx.try_pop() {
            if let Some(prev) = last {
                assert!(t > prev);
            }
            last = Some(t);
        }
    }
}
