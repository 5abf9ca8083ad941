//! Slot machine session
//!
//! Owns the registry, the current assignment, one reel per role, the round
//! sequencer and the timer arena. Every timer callback funnels through
//! [`SlotMachine::advance`], so the whole session runs on one logical thread.

use crate::announcement::generate_announcement;
use crate::assignment;
use crate::config::SlotConfig;
use crate::confirm::{ConfirmGuard, ConfirmPress};
use crate::error::{Result, SlotError};
use crate::events::{Notice, SlotEvent};
use crate::models::{GameState, Participant, Role, RoleWinner, SpinResult};
use crate::reel::{ReelController, ReelLabel};
use crate::registry::Registry;
use crate::scheduler::{Scheduler, TimerId};
use crate::sequencer::SpinSequencer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the presentation layer needs to draw one reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelView {
    pub role_id: String,
    pub role: String,
    pub label: ReelLabel,
    pub target: Option<Participant>,
    pub spinning: bool,
    pub active: bool,
    pub show_respin: bool,
    pub landing_delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// First press; press again within the window to clear
    Armed,
    Cleared(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineSnapshot {
    pub now_ms: u64,
    pub state: GameState,
    pub round: u64,
    pub participants: Vec<Participant>,
    pub roles: Vec<Role>,
    pub results: Vec<RoleWinner>,
    pub announcement: Option<String>,
    pub reels: Vec<ReelView>,
}

pub struct SlotMachine {
    config: SlotConfig,
    registry: Registry,
    result: SpinResult,
    reels: HashMap<String, ReelController>,
    sequencer: SpinSequencer,
    scheduler: Scheduler<SlotEvent>,
    clear_guard: ConfirmGuard,
    rng: ChaCha8Rng,
}

impl SlotMachine {
    /// `seed` makes every draw reproducible; `None` picks a random seed.
    pub fn new(registry: Registry, config: SlotConfig, seed: Option<u64>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(rand::random));
        let count = registry.participants().len();
        let reels = registry
            .roles()
            .iter()
            .map(|r| (r.id.clone(), ReelController::new(r.id.clone(), count, &mut rng)))
            .collect();

        Self {
            clear_guard: ConfirmGuard::new(config.confirm_window_ms),
            config,
            registry,
            result: SpinResult::new(),
            reels,
            sequencer: SpinSequencer::new(),
            scheduler: Scheduler::new(),
            rng,
        }
    }

    pub fn with_defaults(seed: Option<u64>) -> Self {
        Self::new(Registry::with_defaults(), SlotConfig::default(), seed)
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn state(&self) -> GameState {
        self.sequencer.state()
    }

    pub fn round(&self) -> u64 {
        self.sequencer.round()
    }

    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn result(&self) -> &SpinResult {
        &self.result
    }

    pub fn announcement(&self) -> Option<&str> {
        self.sequencer.announcement()
    }

    pub fn is_clear_armed(&self) -> bool {
        self.clear_guard.is_armed()
    }

    pub fn role_winners(&self) -> Vec<RoleWinner> {
        self.result.role_winners(self.registry.roles())
    }

    // ========================
    // Spins
    // ========================

    pub fn spin_all(&mut self) -> Result<u64> {
        self.ensure_idle()?;
        let result =
            assignment::full_spin(self.registry.participants(), self.registry.roles(), &mut self.rng)?;
        self.result = result;

        let active = self.registry.roles().iter().map(|r| r.id.clone()).collect();
        self.start_round(active)
    }

    pub fn respin(&mut self, role_id: &str) -> Result<u64> {
        self.ensure_idle()?;
        let winner = assignment::respin_candidate(
            role_id,
            &self.result,
            self.registry.participants(),
            self.registry.roles(),
            &mut self.rng,
        )?;
        tracing::debug!(role_id, winner = %winner.name, "respin target chosen");
        self.result.assign(role_id, winner);

        self.start_round(vec![role_id.to_string()])
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.state().accepts_spin() {
            Ok(())
        } else {
            Err(SlotError::SpinInProgress)
        }
    }

    fn start_round(&mut self, active: Vec<String>) -> Result<u64> {
        let round = self.sequencer.begin_round(active, &mut self.scheduler, &self.config)?;
        // A half-confirmed clear does not survive into a locked round
        self.clear_guard.reset(&mut self.scheduler);
        for role_id in self.sequencer.active() {
            if let Some(reel) = self.reels.get_mut(role_id) {
                reel.power_on(&mut self.scheduler, self.config.tick_ms);
            }
        }
        Ok(round)
    }

    /// Landing delay for a role given the current active set.
    pub fn landing_delay(&self, role_id: &str) -> u64 {
        let position = self.registry.role_position(role_id).unwrap_or(0);
        self.config.landing_delay(position, self.sequencer.active().len())
    }

    // ========================
    // Time
    // ========================

    /// Run every timer due within the next `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) -> Vec<Notice> {
        let until = self.scheduler.now().saturating_add(ms);
        let mut notices = Vec::new();
        while let Some((timer, event)) = self.scheduler.pop_due(until) {
            self.dispatch(timer, event, &mut notices);
        }
        self.scheduler.advance_to(until);
        notices
    }

    /// Run timers until the round has landed and its announcement is out.
    pub fn run_until_settled(&mut self) -> Vec<Notice> {
        let horizon = self.scheduler.now().saturating_add(self.settle_budget());
        let mut notices = Vec::new();
        while !self.is_settled() {
            let Some((timer, event)) = self.scheduler.pop_due(horizon) else {
                tracing::warn!(state = %self.state(), "round did not settle within its time budget");
                break;
            };
            self.dispatch(timer, event, &mut notices);
        }
        notices
    }

    pub fn is_settled(&self) -> bool {
        match self.state() {
            GameState::Idle => true,
            GameState::Result => self.announcement().is_some(),
            GameState::Spinning | GameState::Stopping => false,
        }
    }

    /// Longest a round can take from start to announcement.
    fn settle_budget(&self) -> u64 {
        let roles = self.registry.roles().len().max(1);
        self.config
            .full_spin_ms
            .max(self.config.respin_ms)
            .saturating_add(self.config.landing_delay(roles, roles))
            .saturating_add(self.config.announcement_delay_ms)
            .saturating_add(self.config.tick_ms)
    }

    fn dispatch(&mut self, timer: TimerId, event: SlotEvent, notices: &mut Vec<Notice>) {
        match event {
            SlotEvent::SpinElapsed { round } => {
                if self.sequencer.spin_elapsed(round) {
                    notices.push(Notice::Stopping { round });
                    self.cut_power(round);
                }
            }
            SlotEvent::ReelTick { role_id } => {
                let count = self.registry.participants().len();
                if let Some(reel) = self.reels.get_mut(&role_id) {
                    reel.tick(count);
                }
            }
            SlotEvent::ReelLanding { role_id, round } => self.on_landing(timer, &role_id, round, notices),
            SlotEvent::AnnouncementReady { round, text } => {
                if self.sequencer.set_announcement(round, text.clone()) {
                    notices.push(Notice::Announcement(text));
                }
            }
            SlotEvent::ConfirmExpired => {
                if self.clear_guard.expire(timer) {
                    notices.push(Notice::ConfirmExpired);
                }
            }
        }
    }

    fn cut_power(&mut self, round: u64) {
        let active = self.sequencer.active().to_vec();
        for role_id in &active {
            let delay = self.landing_delay(role_id);
            if let Some(reel) = self.reels.get_mut(role_id) {
                reel.power_off(&mut self.scheduler, self.result.get(role_id), delay, round);
            }
        }
    }

    fn on_landing(&mut self, timer: TimerId, role_id: &str, round: u64, notices: &mut Vec<Notice>) {
        let Some(reel) = self.reels.get_mut(role_id) else {
            return;
        };
        let target = self.result.get(role_id);
        if !reel.land(timer, &mut self.scheduler, self.registry.participants(), target) {
            return;
        }

        notices.push(Notice::ReelLanded {
            role_id: role_id.to_string(),
            winner: target.map(|p| p.name.clone()),
        });

        if self.sequencer.reel_stopped(round) {
            notices.push(Notice::RoundComplete { round });
            let winners = self.role_winners();
            let text = generate_announcement(&winners, &mut self.rng);
            self.scheduler.schedule(
                self.config.announcement_delay_ms,
                SlotEvent::AnnouncementReady { round, text },
            );
        }
    }

    // ========================
    // Registry edits
    // ========================

    fn ensure_unlocked(&self) -> Result<()> {
        if self.state().is_active() {
            Err(SlotError::RegistryLocked)
        } else {
            Ok(())
        }
    }

    pub fn add_participants(&mut self, raw: &str) -> Result<Vec<Participant>> {
        self.ensure_unlocked()?;
        Ok(self.registry.add_participants(raw))
    }

    pub fn remove_participant(&mut self, id: &str) -> Result<Option<Participant>> {
        self.ensure_unlocked()?;
        Ok(self.registry.remove_participant(id))
    }

    /// "Clear all": first press arms, second press within the window clears.
    pub fn clear_participants(&mut self) -> Result<ClearOutcome> {
        self.ensure_unlocked()?;
        match self.clear_guard.press(&mut self.scheduler, SlotEvent::ConfirmExpired) {
            ConfirmPress::Armed => Ok(ClearOutcome::Armed),
            ConfirmPress::Confirmed => {
                let count = self.registry.clear_participants();
                tracing::info!(count, "participants cleared");
                Ok(ClearOutcome::Cleared(count))
            }
        }
    }

    pub fn add_role(&mut self, name: &str) -> Result<Role> {
        self.ensure_unlocked()?;
        let role = self.registry.add_role(name)?;
        let reel =
            ReelController::new(role.id.clone(), self.registry.participants().len(), &mut self.rng);
        self.reels.insert(role.id.clone(), reel);
        Ok(role)
    }

    pub fn remove_role(&mut self, role_id: &str) -> Result<Role> {
        self.ensure_unlocked()?;
        let role = self.registry.remove_role(role_id)?;
        if let Some(mut reel) = self.reels.remove(role_id) {
            reel.unmount(&mut self.scheduler);
        }
        self.result.remove(role_id);
        Ok(role)
    }

    pub fn rename_role(&mut self, role_id: &str, name: &str) -> Result<()> {
        self.ensure_unlocked()?;
        self.registry.rename_role(role_id, name)
    }

    // ========================
    // Views
    // ========================

    pub fn reel_views(&self) -> Vec<ReelView> {
        let participants = self.registry.participants();
        let state = self.state();
        self.registry
            .roles()
            .iter()
            .filter_map(|role| {
                let reel = self.reels.get(&role.id)?;
                Some(ReelView {
                    role_id: role.id.clone(),
                    role: role.name.clone(),
                    label: reel.label(participants, self.result.get(&role.id)),
                    target: self.result.get(&role.id).cloned(),
                    spinning: reel.is_spinning(),
                    active: self.sequencer.is_active(&role.id),
                    show_respin: state == GameState::Result && !reel.is_spinning(),
                    landing_delay_ms: self.landing_delay(&role.id),
                })
            })
            .collect()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            now_ms: self.now(),
            state: self.state(),
            round: self.round(),
            participants: self.registry.participants().to_vec(),
            roles: self.registry.roles().to_vec(),
            results: self.role_winners(),
            announcement: self.announcement().map(str::to_string),
            reels: self.reel_views(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(participants: &str, roles: &[&str], seed: u64) -> SlotMachine {
        let mut registry = Registry::new();
        registry.add_participants(participants);
        for role in roles {
            registry.add_role(role).unwrap();
        }
        SlotMachine::new(registry, SlotConfig::default(), Some(seed))
    }

    #[test]
    fn test_full_round_timeline() {
        let mut m = machine("A,B,C", &["Host", "Judge"], 1);
        m.spin_all().unwrap();
        assert_eq!(m.state(), GameState::Spinning);

        let notices = m.advance(2499);
        assert!(notices.is_empty());
        assert_eq!(m.state(), GameState::Spinning);

        let notices = m.advance(1);
        assert_eq!(notices, vec![Notice::Stopping { round: 1 }]);
        assert_eq!(m.state(), GameState::Stopping);

        // Host lands after 1500, Judge after 2500
        let notices = m.advance(1500);
        assert_eq!(notices.len(), 1);
        assert_eq!(m.state(), GameState::Stopping);

        let notices = m.advance(1000);
        assert!(matches!(notices.last(), Some(Notice::RoundComplete { round: 1 })));
        assert_eq!(m.state(), GameState::Result);
        assert!(m.announcement().is_none());

        let notices = m.advance(500);
        assert!(matches!(notices.as_slice(), [Notice::Announcement(_)]));
        assert!(m.is_settled());
    }

    #[test]
    fn test_landed_reels_show_winners() {
        let mut m = machine("A,B,C,D", &["Host", "Judge", "Jester"], 2);
        m.spin_all().unwrap();
        m.run_until_settled();

        for view in m.reel_views() {
            let winner = m.result().get(&view.role_id).unwrap();
            assert_eq!(view.label, ReelLabel::Name(winner.name.clone()));
            assert!(!view.spinning);
            assert!(view.show_respin);
        }
    }

    #[test]
    fn test_respin_round_uses_single_reel_timings() {
        let mut m = machine("A,B,C", &["Host", "Judge"], 3);
        m.spin_all().unwrap();
        m.run_until_settled();

        let judge_id = m.registry().roles()[1].id.clone();
        let start = m.now();
        m.respin(&judge_id).unwrap();
        assert_eq!(m.landing_delay(&judge_id), 1500);

        m.run_until_settled();
        assert_eq!(m.state(), GameState::Result);
        // 1500 spin + 1500 landing + 500 announcement
        assert_eq!(m.now() - start, 3500);

        let host = m.result().get(&m.registry().roles()[0].id).unwrap();
        assert_ne!(host.id, m.result().get(&judge_id).unwrap().id);
    }

    #[test]
    fn test_spin_rejected_while_active() {
        let mut m = machine("A,B,C", &["Host"], 4);
        m.spin_all().unwrap();
        assert!(matches!(m.spin_all(), Err(SlotError::SpinInProgress)));

        let host = m.registry().roles()[0].id.clone();
        assert!(matches!(m.respin(&host), Err(SlotError::SpinInProgress)));
        assert!(matches!(m.add_participants("Z"), Err(SlotError::RegistryLocked)));
        assert!(matches!(m.add_role("Late"), Err(SlotError::RegistryLocked)));
    }

    #[test]
    fn test_validation_errors_leave_machine_idle() {
        let mut m = machine("A", &[], 5);
        assert!(matches!(m.spin_all(), Err(SlotError::NoRolesConfigured)));
        assert_eq!(m.state(), GameState::Idle);

        m.add_role("Host").unwrap();
        m.add_role("Judge").unwrap();
        assert!(matches!(
            m.spin_all(),
            Err(SlotError::InsufficientParticipants { needed: 2, available: 1 })
        ));
        assert_eq!(m.state(), GameState::Idle);
        assert!(m.result().is_empty());
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut m = machine("A,B,C", &["Host"], 6);
        assert_eq!(m.clear_participants().unwrap(), ClearOutcome::Armed);
        assert_eq!(m.advance(3000), vec![Notice::ConfirmExpired]);
        assert!(!m.is_clear_armed());
        assert_eq!(m.registry().participants().len(), 3);

        assert_eq!(m.clear_participants().unwrap(), ClearOutcome::Armed);
        m.advance(1000);
        assert_eq!(m.clear_participants().unwrap(), ClearOutcome::Cleared(3));
        assert!(m.advance(5000).is_empty());

        let views = m.reel_views();
        assert_eq!(views[0].label, ReelLabel::Empty);
    }

    #[test]
    fn test_spin_disarms_pending_clear() {
        let mut m = machine("A,B,C", &["Host"], 9);
        assert_eq!(m.clear_participants().unwrap(), ClearOutcome::Armed);

        m.spin_all().unwrap();
        assert!(!m.is_clear_armed());
        let notices = m.run_until_settled();
        assert!(!notices.contains(&Notice::ConfirmExpired));

        // The press before the round no longer counts
        assert_eq!(m.clear_participants().unwrap(), ClearOutcome::Armed);
        assert_eq!(m.registry().participants().len(), 3);
    }

    #[test]
    fn test_remove_role_drops_reel_and_result() {
        let mut m = machine("A,B,C", &["Host", "Judge"], 7);
        m.spin_all().unwrap();
        m.run_until_settled();

        let host = m.registry().roles()[0].id.clone();
        m.remove_role(&host).unwrap();
        assert!(m.result().get(&host).is_none());
        assert_eq!(m.reel_views().len(), 1);
        assert_eq!(m.snapshot().results.len(), 1);
    }

    #[test]
    fn test_unassigned_reel_reads_ready() {
        let m = machine("A,B", &["Host"], 8);
        let views = m.reel_views();
        assert_eq!(views[0].label, ReelLabel::Ready);
        assert!(!views[0].show_respin);
    }
}
