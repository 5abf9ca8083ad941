//! Round-scoped completion barrier
//!
//! Counts stop notifications for one round. Notifications carrying another
//! round's number are dropped so a late landing can never complete a newer round.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Notification belongs to another round
    Stale,
    Waiting { remaining: usize },
    /// This notification completed the round
    Complete,
    /// Round already complete; notification ignored
    Overflow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBarrier {
    round: u64,
    expected: usize,
    arrived: usize,
}

impl RoundBarrier {
    pub fn new(round: u64, expected: usize) -> Self {
        Self { round, expected, arrived: 0 }
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn arrived(&self) -> usize {
        self.arrived
    }

    pub fn is_complete(&self) -> bool {
        self.arrived >= self.expected
    }

    pub fn arrive(&mut self, round: u64) -> Arrival {
        if round != self.round {
            return Arrival::Stale;
        }
        if self.is_complete() {
            return Arrival::Overflow;
        }

        self.arrived += 1;
        if self.is_complete() {
            Arrival::Complete
        } else {
            Arrival::Waiting { remaining: self.expected - self.arrived }
        }
    }
}
