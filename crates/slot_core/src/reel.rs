//! Per-role reel animation
//!
//! A reel cycles through the participant list while powered. Cutting power
//! schedules a landing; when it fires the reel shows its target and reports
//! one stop for the round. Powering on again drops any pending landing.

use crate::events::SlotEvent;
use crate::models::Participant;
use crate::scheduler::{Scheduler, TimerId};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const EMPTY_REEL_LABEL: &str = "Add Names";
pub const READY_LABEL: &str = "Ready";
pub const MISSING_NAME_LABEL: &str = "???";

/// Text shown in the reel window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ReelLabel {
    /// No participants to cycle through
    Empty,
    /// Nothing assigned to this role yet
    Ready,
    Name(String),
}

impl ReelLabel {
    pub fn text(&self) -> &str {
        match self {
            ReelLabel::Empty => EMPTY_REEL_LABEL,
            ReelLabel::Ready => READY_LABEL,
            ReelLabel::Name(name) => name,
        }
    }
}

#[derive(Debug)]
pub struct ReelController {
    role_id: String,
    display_index: usize,
    spinning: bool,
    tick_timer: Option<TimerId>,
    landing_timer: Option<TimerId>,
}

impl ReelController {
    /// Mount a reel on a random starting row.
    pub fn new<R: Rng + ?Sized>(role_id: impl Into<String>, participant_count: usize, rng: &mut R) -> Self {
        let display_index = if participant_count > 0 { rng.gen_range(0..participant_count) } else { 0 };
        Self {
            role_id: role_id.into(),
            display_index,
            spinning: false,
            tick_timer: None,
            landing_timer: None,
        }
    }

    pub fn role_id(&self) -> &str {
        &self.role_id
    }

    pub fn display_index(&self) -> usize {
        self.display_index
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn has_pending_landing(&self) -> bool {
        self.landing_timer.is_some()
    }

    pub fn power_on(&mut self, scheduler: &mut Scheduler<SlotEvent>, tick_ms: u64) {
        if let Some(landing) = self.landing_timer.take() {
            scheduler.cancel(landing);
            tracing::debug!(role_id = %self.role_id, "pending landing cancelled by new spin");
        }

        self.spinning = true;
        if self.tick_timer.is_none() {
            let tick = scheduler
                .schedule_repeating(tick_ms, SlotEvent::ReelTick { role_id: self.role_id.clone() });
            self.tick_timer = Some(tick);
        }
    }

    /// Cut power; the reel keeps cycling until the landing fires.
    ///
    /// Without a target there is nothing to land on and the call is a no-op.
    pub fn power_off(
        &mut self,
        scheduler: &mut Scheduler<SlotEvent>,
        target: Option<&Participant>,
        delay_ms: u64,
        round: u64,
    ) {
        if !self.spinning {
            return;
        }
        if target.is_none() {
            tracing::warn!(role_id = %self.role_id, "power cut without a target, reel keeps spinning");
            return;
        }

        if let Some(previous) = self.landing_timer.take() {
            scheduler.cancel(previous);
        }
        let landing = scheduler.schedule(
            delay_ms,
            SlotEvent::ReelLanding { role_id: self.role_id.clone(), round },
        );
        self.landing_timer = Some(landing);
    }

    pub fn tick(&mut self, participant_count: usize) {
        if self.spinning && participant_count > 0 {
            self.display_index = (self.display_index + 1) % participant_count;
        }
    }

    /// Handle a landing timer. Returns true when the stop must be reported.
    ///
    /// Only the currently armed landing counts, which keeps stops at one per
    /// power cycle.
    pub fn land(
        &mut self,
        timer: TimerId,
        scheduler: &mut Scheduler<SlotEvent>,
        participants: &[Participant],
        target: Option<&Participant>,
    ) -> bool {
        if self.landing_timer != Some(timer) {
            return false;
        }
        self.landing_timer = None;
        self.stop_ticking(scheduler);
        self.spinning = false;

        if let Some(target) = target {
            match participants.iter().position(|p| p.id == target.id) {
                Some(idx) => self.display_index = idx,
                None => tracing::warn!(
                    role_id = %self.role_id,
                    target = %target.id,
                    "target no longer listed, keeping current row"
                ),
            }
        }
        true
    }

    /// Cancel every timer owned by this reel.
    pub fn unmount(&mut self, scheduler: &mut Scheduler<SlotEvent>) {
        if let Some(landing) = self.landing_timer.take() {
            scheduler.cancel(landing);
        }
        self.stop_ticking(scheduler);
        self.spinning = false;
    }

    fn stop_ticking(&mut self, scheduler: &mut Scheduler<SlotEvent>) {
        if let Some(tick) = self.tick_timer.take() {
            scheduler.cancel(tick);
        }
    }

    pub fn label(&self, participants: &[Participant], target: Option<&Participant>) -> ReelLabel {
        if participants.is_empty() {
            return ReelLabel::Empty;
        }
        if target.is_none() {
            return ReelLabel::Ready;
        }
        let name = participants
            .get(self.display_index)
            .or_else(|| participants.first())
            .map(|p| p.name.clone())
            .unwrap_or_else(|| MISSING_NAME_LABEL.to_string());
        ReelLabel::Name(name)
    }
}
