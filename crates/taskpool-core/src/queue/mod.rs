//! Queue module: the task queue workers pull from and the inbox results go to.

mod bounded;
mod inbox;

pub use bounded::BoundedQueue;
pub use inbox::{Collected, ResultInbox, Tally};

use std::sync::{Condvar, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

/// A rejected `put`. The item is handed back so nothing is silently dropped.
#[derive(Debug, Error)]
pub enum QueueError<T> {
    #[error("queue is closed")]
    Closed(T),

    #[error("queue is full")]
    Full(T),
}

impl<T> QueueError<T> {
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Closed(item) | QueueError::Full(item) => item,
        }
    }
}

/// `now + timeout`, or `None` when that does not fit in an `Instant`
/// (e.g. `Duration::MAX`); `None` means wait without a deadline.
pub(crate) fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

/// One wait on `cond` bounded by `deadline`. Returns `None` once the deadline has passed.
pub(crate) fn wait_until<'a, S>(
    cond: &Condvar,
    guard: MutexGuard<'a, S>,
    deadline: Option<Instant>,
) -> Option<MutexGuard<'a, S>> {
    let Some(deadline) = deadline else {
        return Some(cond.wait(guard).unwrap_or_else(PoisonError::into_inner));
    };
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return None;
    }
    let (guard, _) = cond
        .wait_timeout(guard, remaining)
        .unwrap_or_else(PoisonError::into_inner);
    Some(guard)
}
