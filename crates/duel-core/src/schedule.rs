//! Cancellable deferred tasks.
//!
//! Attack expiry, the invulnerability window and the round countdown are
//! effects that must happen "later" on the host clock. Each owner (a fighter,
//! or the duel) keeps its own [`Scheduler`] and polls it with the current time.
//!
//! # Cancellation
//!
//! [`Scheduler::cancel_all`] empties the queue and advances the scheduler's
//! epoch. A [`TaskHandle`] minted before the cancel can no longer cancel or
//! match anything, so a reset can never be undone by a stale deferred effect.
//!
//! # Ordering
//!
//! Due tasks are returned ordered by due time, then by scheduling order.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

use crate::time::Millis;

/// Identifies one scheduled task for cancellation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    epoch: u64,
    seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A min-heap of tasks keyed by due time.
///
/// # Example
///
/// ```
/// use duel_core::schedule::Scheduler;
/// use duel_core::time::Millis;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.schedule(Millis::new(200), "attack over");
/// scheduler.schedule(Millis::new(500), "vulnerable again");
///
/// assert_eq!(scheduler.drain_due(Millis::new(300)), vec!["attack over"]);
///
/// scheduler.cancel_all();
/// assert!(scheduler.drain_due(Millis::new(1_000)).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: BTreeSet<u64>,
    epoch: u64,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            cancelled: BTreeSet::new(),
            epoch: 0,
            next_seq: 0,
        }
    }

    /// Schedules `task` to become due at `due`.
    pub fn schedule(&mut self, due: Millis, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, task }));
        TaskHandle {
            epoch: self.epoch,
            seq,
        }
    }

    /// Cancels one task. Returns `false` if the handle is stale or already
    /// fired or cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        if handle.epoch != self.epoch {
            return false;
        }
        let pending = self
            .queue
            .iter()
            .any(|Reverse(entry)| entry.seq == handle.seq);
        pending && self.cancelled.insert(handle.seq)
    }

    /// Drops every pending task and invalidates all outstanding handles.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
        self.epoch += 1;
    }

    /// Removes and returns every task due at or before `now`.
    pub fn drain_due(&mut self, now: Millis) -> Vec<T> {
        let mut due = Vec::new();
        while self
            .queue
            .peek()
            .is_some_and(|Reverse(entry)| entry.due <= now)
        {
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            if !self.cancelled.remove(&entry.seq) {
                due.push(entry.task);
            }
        }
        due
    }

    /// Number of tasks still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    /// Returns `true` if nothing is waiting to fire.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Due time of the earliest live task.
    #[must_use]
    pub fn next_due(&self) -> Option<Millis> {
        self.queue
            .iter()
            .filter(|Reverse(entry)| !self.cancelled.contains(&entry.seq))
            .map(|Reverse(entry)| entry.due)
            .min()
    }
}
