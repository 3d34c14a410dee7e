// Copyright 2026 The Bubbleplan Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Cancellable delayed tasks on a virtual clock.
//!
//! Replaces ad hoc timer-handle juggling with one uniform abstraction:
//! [`Scheduler::schedule`] returns a [`CancelToken`], and the owner
//! pumps [`Scheduler::advance`] to collect whatever came due.  Tasks
//! are plain values (typically a small command enum) so the scheduler
//! never borrows into its caller.  Everything is deterministic and
//! single-threaded; there is no real time anywhere.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Identifies a scheduled task so it can be cancelled before it fires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CancelToken(u64);

pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    // (deadline, id); ids increase monotonically so equal deadlines
    // fire in scheduling order
    queue: BinaryHeap<Reverse<(u64, u64)>>,
    pending: HashMap<u64, T>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Scheduler {
            now_ms: 0,
            next_id: 0,
            queue: BinaryHeap::new(),
            pending: HashMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Run `task` once `delay_ms` of virtual time has passed.  A delay
    /// of zero fires on the next [`advance`](Scheduler::advance), even
    /// `advance(0)`.
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> CancelToken {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Reverse((self.now_ms + delay_ms, id)));
        self.pending.insert(id, task);
        CancelToken(id)
    }

    /// Drop a pending task.  Returns false (and does nothing) if the
    /// task already fired or was already cancelled.
    pub fn cancel(&mut self, token: CancelToken) -> bool {
        // the queue entry stays behind and is skipped when popped
        self.pending.remove(&token.0).is_some()
    }

    pub fn is_pending(&self, token: CancelToken) -> bool {
        self.pending.contains_key(&token.0)
    }

    /// Move the clock forward and return every task that came due, in
    /// deadline order.
    pub fn advance(&mut self, ms: u64) -> Vec<T> {
        self.now_ms += ms;
        let mut due = Vec::new();
        while let Some(&Reverse((deadline, id))) = self.queue.peek() {
            if deadline > self.now_ms {
                break;
            }
            self.queue.pop();
            if let Some(task) = self.pending.remove(&id) {
                due.push(task);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_deadline() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        scheduler.schedule(100, "fit");

        assert!(scheduler.advance(99).is_empty());
        assert_eq!(vec!["fit"], scheduler.advance(1));
        assert!(scheduler.advance(1000).is_empty(), "tasks fire once");
    }

    #[test]
    fn test_deadline_order_fifo_on_ties() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        scheduler.schedule(50, "late");
        scheduler.schedule(10, "early-a");
        scheduler.schedule(10, "early-b");

        assert_eq!(vec!["early-a", "early-b", "late"], scheduler.advance(60));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let keep = scheduler.schedule(10, "keep");
        let drop = scheduler.schedule(10, "drop");

        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop), "second cancel is a no-op");
        assert!(scheduler.is_pending(keep));
        assert!(!scheduler.is_pending(drop));

        assert_eq!(vec!["keep"], scheduler.advance(10));
        assert!(!scheduler.cancel(keep), "cancelling a fired task is a no-op");
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        scheduler.schedule(0, "next-frame");
        assert_eq!(vec!["next-frame"], scheduler.advance(0));
    }

    #[test]
    fn test_debounce_pattern() {
        // cancel-then-reschedule coalesces a burst into one firing
        let mut scheduler: Scheduler<&str> = Scheduler::new();
        let mut token = scheduler.schedule(250, "fit");
        for _ in 0..5 {
            assert!(scheduler.advance(100).is_empty());
            scheduler.cancel(token);
            token = scheduler.schedule(250, "fit");
        }
        assert_eq!(vec!["fit"], scheduler.advance(250));
        assert_eq!(0, scheduler.pending_count());
    }

    #[test]
    fn test_clock_accumulates() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        scheduler.advance(40);
        assert_eq!(40, scheduler.now_ms());
        scheduler.schedule(10, 7);
        assert_eq!(vec![7], scheduler.advance(10));
        assert_eq!(50, scheduler.now_ms());
    }
}
