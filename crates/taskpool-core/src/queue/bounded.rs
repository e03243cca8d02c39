//! BoundedQueue - Mutex + Condvar による blocking FIFO
//!
//! # 学習ポイント
//! - Condvar を 2 本（not_empty / not_full）使って producer と consumer を別々に起こす
//! - `close()` 後の `get()` は、残りを出し切ってから `None`（no more work）を返す
//! - `put()` が失敗したら item を呼び出し側に返す（黙って捨てない）

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{QueueError, deadline_after, wait_until};

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe FIFO with blocking `put`/`get` and an optional capacity.
///
/// `capacity: None` is unbounded; `put` then never blocks.
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
}

impl<T> BoundedQueue<T> {
    /// Create a queue. `Some(0)` is treated as `Some(1)`; callers validate
    /// capacity before getting here.
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = capacity.map(|c| c.max(1));
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity.unwrap_or(0)),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(capacity))
    }

    // workers never panic while holding this lock, so a poisoned guard is still consistent
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_full(&self, state: &State<T>) -> bool {
        self.capacity
            .is_some_and(|cap| state.items.len() >= cap)
    }

    /// Append at the tail, blocking while the queue is full.
    pub fn put(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return Err(QueueError::Closed(item));
            }
            if !self.is_full(&state) {
                break;
            }
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Append without blocking; `Full` hands the item back.
    pub fn try_put(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.lock();
        if state.closed {
            return Err(QueueError::Closed(item));
        }
        if self.is_full(&state) {
            return Err(QueueError::Full(item));
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove the head, blocking while empty.
    ///
    /// Returns `None` only once the queue is closed and drained.
    pub fn get(&self) -> Option<T> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like `get`, but gives up after `timeout` (also `None`).
    pub fn get_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = deadline_after(timeout);
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            let Some(guard) = wait_until(&self.not_empty, state, deadline) else {
                return None;
            };
            state = guard;
        }
    }

    /// Take everything still queued, in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        let items: Vec<T> = self.lock().items.drain(..).collect();
        self.not_full.notify_all();
        items
    }

    /// Stop accepting items and wake every waiter. Idempotent.
    pub fn close(&self) {
        self.lock().closed = true;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
