//! Round state machine: Idle -> Spinning -> Stopping -> Result
//!
//! Full spins and respins share one path; the active set size alone decides
//! the spin duration and barrier size.

use crate::barrier::{Arrival, RoundBarrier};
use crate::config::SlotConfig;
use crate::error::{Result, SlotError};
use crate::events::SlotEvent;
use crate::models::GameState;
use crate::scheduler::{Scheduler, TimerId};

#[derive(Debug, Default)]
pub struct SpinSequencer {
    state: GameState,
    round: u64,
    active: Vec<String>,
    barrier: RoundBarrier,
    announcement: Option<String>,
    spin_timer: Option<TimerId>,
}

impl SpinSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Number of the current (or last) round; 0 before the first spin
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub fn is_active(&self, role_id: &str) -> bool {
        self.active.iter().any(|id| id == role_id)
    }

    pub fn stopped_count(&self) -> usize {
        self.barrier.arrived()
    }

    pub fn announcement(&self) -> Option<&str> {
        self.announcement.as_deref()
    }

    /// Enter `Spinning` for `active` and schedule the switch to `Stopping`.
    pub fn begin_round(
        &mut self,
        active: Vec<String>,
        scheduler: &mut Scheduler<SlotEvent>,
        config: &SlotConfig,
    ) -> Result<u64> {
        if !self.state.accepts_spin() {
            return Err(SlotError::SpinInProgress);
        }
        if active.is_empty() {
            return Err(SlotError::NoRolesConfigured);
        }

        if let Some(stale) = self.spin_timer.take() {
            scheduler.cancel(stale);
        }

        self.round += 1;
        self.state = GameState::Spinning;
        self.announcement = None;
        self.barrier = RoundBarrier::new(self.round, active.len());

        let duration = config.spin_duration(active.len());
        self.spin_timer = Some(scheduler.schedule(duration, SlotEvent::SpinElapsed { round: self.round }));
        self.active = active;

        tracing::info!(round = self.round, reels = self.active.len(), duration, "round started");
        Ok(self.round)
    }

    /// Returns true if this moved the machine to `Stopping`.
    pub fn spin_elapsed(&mut self, round: u64) -> bool {
        if round != self.round || self.state != GameState::Spinning {
            return false;
        }
        self.spin_timer = None;
        self.state = GameState::Stopping;
        true
    }

    /// Count one reel stop. Returns true when it completed the round.
    pub fn reel_stopped(&mut self, round: u64) -> bool {
        if self.state != GameState::Stopping {
            return false;
        }
        match self.barrier.arrive(round) {
            Arrival::Complete => {
                self.state = GameState::Result;
                tracing::info!(round, "all reels stopped");
                true
            }
            Arrival::Waiting { remaining } => {
                tracing::debug!(round, remaining, "reel stopped");
                false
            }
            Arrival::Stale | Arrival::Overflow => {
                tracing::debug!(round, current = self.round, "ignoring stop outside the barrier");
                false
            }
        }
    }

    pub fn set_announcement(&mut self, round: u64, text: String) -> bool {
        if round != self.round || self.state != GameState::Result {
            return false;
        }
        self.announcement = Some(text);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("r{i}")).collect()
    }

    #[test]
    fn test_full_round_transitions() {
        let config = SlotConfig::default();
        let mut scheduler = Scheduler::new();
        let mut seq = SpinSequencer::new();
        assert_eq!(seq.state(), GameState::Idle);

        let round = seq.begin_round(ids(2), &mut scheduler, &config).unwrap();
        assert_eq!(seq.state(), GameState::Spinning);

        let (_, event) = scheduler.pop_due(u64::MAX).unwrap();
        assert_eq!(scheduler.now(), 2500);
        assert_eq!(event, SlotEvent::SpinElapsed { round });
        assert!(seq.spin_elapsed(round));
        assert_eq!(seq.state(), GameState::Stopping);

        assert!(!seq.reel_stopped(round));
        assert_eq!(seq.state(), GameState::Stopping);
        assert!(seq.reel_stopped(round));
        assert_eq!(seq.state(), GameState::Result);
        assert!(!seq.reel_stopped(round));
    }

    #[test]
    fn test_single_reel_uses_respin_duration() {
        let config = SlotConfig::default();
        let mut scheduler = Scheduler::new();
        let mut seq = SpinSequencer::new();

        seq.begin_round(ids(1), &mut scheduler, &config).unwrap();
        scheduler.pop_due(u64::MAX).unwrap();
        assert_eq!(scheduler.now(), 1500);
    }

    #[test]
    fn test_rejects_spin_while_active() {
        let config = SlotConfig::default();
        let mut scheduler = Scheduler::new();
        let mut seq = SpinSequencer::new();

        let round = seq.begin_round(ids(1), &mut scheduler, &config).unwrap();
        assert!(matches!(
            seq.begin_round(ids(1), &mut scheduler, &config),
            Err(SlotError::SpinInProgress)
        ));
        seq.spin_elapsed(round);
        assert!(seq.begin_round(ids(1), &mut scheduler, &config).is_err());

        seq.reel_stopped(round);
        assert_eq!(seq.begin_round(ids(3), &mut scheduler, &config).unwrap(), round + 1);
        assert_eq!(seq.active().len(), 3);
        assert_eq!(seq.stopped_count(), 0);
    }

    #[test]
    fn test_stale_round_events_are_ignored() {
        let config = SlotConfig::default();
        let mut scheduler = Scheduler::new();
        let mut seq = SpinSequencer::new();

        let first = seq.begin_round(ids(1), &mut scheduler, &config).unwrap();
        seq.spin_elapsed(first);
        seq.reel_stopped(first);
        assert!(seq.set_announcement(first, "done".into()));

        let second = seq.begin_round(ids(2), &mut scheduler, &config).unwrap();
        assert!(seq.announcement().is_none());
        assert!(!seq.spin_elapsed(first));
        assert!(!seq.set_announcement(first, "late".into()));

        seq.spin_elapsed(second);
        assert!(!seq.reel_stopped(first));
        assert_eq!(seq.stopped_count(), 0);
    }
}
