//! Two-step confirmation for destructive actions
//!
//! The first press arms the guard for a fixed window; a second press inside
//! the window commits. When the window runs out the guard disarms itself.

use crate::scheduler::{Scheduler, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmPress {
    Armed,
    Confirmed,
}

#[derive(Debug)]
pub struct ConfirmGuard {
    window_ms: u64,
    expiry: Option<TimerId>,
}

impl ConfirmGuard {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, expiry: None }
    }

    pub fn is_armed(&self) -> bool {
        self.expiry.is_some()
    }

    pub fn press<E>(&mut self, scheduler: &mut Scheduler<E>, expiry_event: E) -> ConfirmPress {
        match self.expiry.take() {
            Some(expiry) => {
                scheduler.cancel(expiry);
                ConfirmPress::Confirmed
            }
            None => {
                self.expiry = Some(scheduler.schedule(self.window_ms, expiry_event));
                ConfirmPress::Armed
            }
        }
    }

    /// Disarm if `timer` is the live expiry. Returns whether it was.
    pub fn expire(&mut self, timer: TimerId) -> bool {
        if self.expiry == Some(timer) {
            self.expiry = None;
            true
        } else {
            false
        }
    }

    pub fn reset<E>(&mut self, scheduler: &mut Scheduler<E>) {
        if let Some(expiry) = self.expiry.take() {
            scheduler.cancel(expiry);
        }
    }
}
