//! ResultInbox - worker が結果を置き、呼び出し側が取りに来る場所
//!
//! outstanding（submit 済み・結果未到着）の集合も同じロックで持つので、
//! 「待つべき結果がまだあるか」を race なしに判定できます。

use std::collections::{HashSet, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{deadline_after, wait_until};
use crate::domain::{FailureReason, Outcome, TaskId, TaskResult};

/// What a collect attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    Ready(TaskResult),
    /// Nothing outstanding and nothing ready.
    NothingPending,
    TimedOut,
}

/// Running totals over every result ever published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: u64,
    pub failed: u64,
    pub crashed: u64,
}

#[derive(Default)]
struct State {
    outstanding: HashSet<TaskId>,
    ready: VecDeque<TaskResult>,
    tally: Tally,
}

#[derive(Default)]
pub struct ResultInbox {
    state: Mutex<State>,
    changed: Condvar,
}

impl ResultInbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that a result for `task_id` will arrive.
    pub fn reserve(&self, task_id: TaskId) {
        self.lock().outstanding.insert(task_id);
    }

    /// Undo `reserve` for a task that never made it into the queue.
    pub fn cancel(&self, task_id: TaskId) {
        self.lock().outstanding.remove(&task_id);
        self.changed.notify_all();
    }

    pub fn publish(&self, result: TaskResult) {
        {
            let mut state = self.lock();
            state.outstanding.remove(&result.task_id());
            match result.outcome() {
                Outcome::Success(_) => state.tally.succeeded += 1,
                Outcome::Failure(FailureReason::WorkerCrashed(_)) => {
                    state.tally.failed += 1;
                    state.tally.crashed += 1;
                }
                Outcome::Failure(_) => state.tally.failed += 1,
            }
            state.ready.push_back(result);
        }
        // wait_for の待ち手は別の task_id を待っているかもしれないので全員起こす
        self.changed.notify_all();
    }

    /// Block until the next result is ready or nothing is pending.
    pub fn collect(&self) -> Collected {
        let mut state = self.lock();
        loop {
            if let Some(result) = state.ready.pop_front() {
                return Collected::Ready(result);
            }
            if state.outstanding.is_empty() {
                return Collected::NothingPending;
            }
            state = self
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn collect_timeout(&self, timeout: Duration) -> Collected {
        let deadline = deadline_after(timeout);
        let mut state = self.lock();
        loop {
            if let Some(result) = state.ready.pop_front() {
                return Collected::Ready(result);
            }
            if state.outstanding.is_empty() {
                return Collected::NothingPending;
            }
            let Some(guard) = wait_until(&self.changed, state, deadline) else {
                return Collected::TimedOut;
            };
            state = guard;
        }
    }

    pub fn try_collect(&self) -> Option<TaskResult> {
        self.lock().ready.pop_front()
    }

    /// Wait for the result of one task, leaving other results in place.
    ///
    /// `None` means the id is not pending at all (never submitted, or already collected).
    pub fn wait_for(&self, task_id: TaskId, timeout: Duration) -> Option<Collected> {
        let deadline = deadline_after(timeout);
        let mut state = self.lock();
        loop {
            if let Some(pos) = state.ready.iter().position(|r| r.task_id() == task_id) {
                return state.ready.remove(pos).map(Collected::Ready);
            }
            if !state.outstanding.contains(&task_id) {
                return None;
            }
            let Some(guard) = wait_until(&self.changed, state, deadline) else {
                return Some(Collected::TimedOut);
            };
            state = guard;
        }
    }

    /// Drop every ready result nobody collected. Returns how many were dropped.
    pub fn discard_ready(&self) -> usize {
        let mut state = self.lock();
        let dropped = state.ready.len();
        state.ready.clear();
        dropped
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding.len()
    }

    pub fn ready(&self) -> usize {
        self.lock().ready.len()
    }

    pub fn tally(&self) -> Tally {
        self.lock().tally
    }
}
