//! Virtual-time timer arena
//!
//! Single cooperative scheduling domain: nothing runs on its own, the owner
//! pops due events and reacts to them. Time only moves through [`Scheduler::pop_due`].

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<E> {
    event: E,
    interval: Option<u64>,
}

#[derive(Debug)]
pub struct Scheduler<E> {
    now: u64,
    next_id: u64,
    // (deadline, id) - id breaks ties in scheduling order
    queue: BinaryHeap<Reverse<(u64, TimerId)>>,
    timers: HashMap<TimerId, Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self { now: 0, next_id: 0, queue: BinaryHeap::new(), timers: HashMap::new() }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// One-shot timer firing `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.insert(delay_ms, event, None)
    }

    /// Timer firing every `interval_ms` until cancelled
    pub fn schedule_repeating(&mut self, interval_ms: u64, event: E) -> TimerId {
        let interval = interval_ms.max(1);
        self.insert(interval, event, Some(interval))
    }

    fn insert(&mut self, delay_ms: u64, event: E, interval: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse((self.now.saturating_add(delay_ms), id)));
        self.timers.insert(id, Timer { event, interval });
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        // Heap entry stays behind and is skipped when it surfaces
        self.timers.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&mut self) -> Option<u64> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse((deadline, _))| *deadline)
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.queue.peek() {
            if self.timers.contains_key(id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Move the clock forward without firing anything.
    ///
    /// Never jumps past a pending deadline; use [`Scheduler::pop_due`] for that.
    pub fn advance_to(&mut self, time: u64) {
        let limit = self.next_deadline().map_or(time, |d| d.min(time));
        self.now = self.now.max(limit);
    }
}

impl<E: Clone> Scheduler<E> {
    /// Pop the earliest event due at or before `until`, moving the clock to its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, E)> {
        let deadline = self.next_deadline()?;
        if deadline > until {
            return None;
        }

        let Reverse((deadline, id)) = self.queue.pop()?;
        self.now = self.now.max(deadline);

        let timer = self.timers.get(&id)?;
        let event = timer.event.clone();
        match timer.interval {
            Some(interval) => self.queue.push(Reverse((deadline.saturating_add(interval), id))),
            None => {
                self.timers.remove(&id);
            }
        }
        Some((id, event))
    }
}
