//! Random assignment of participants to roles.
//!
//! Full spins draw without replacement via `SliceRandom::shuffle`
//! (Fisher-Yates), so every ordered pick of `R` out of `P` is equally likely.

use crate::error::{Result, SlotError};
use crate::models::{Participant, Role, SpinResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// Fill every role with a distinct participant.
pub fn full_spin<R: Rng + ?Sized>(
    participants: &[Participant],
    roles: &[Role],
    rng: &mut R,
) -> Result<SpinResult> {
    if roles.is_empty() {
        return Err(SlotError::NoRolesConfigured);
    }
    if participants.len() < roles.len() {
        return Err(SlotError::InsufficientParticipants {
            needed: roles.len(),
            available: participants.len(),
        });
    }

    let mut shuffled = participants.to_vec();
    shuffled.shuffle(rng);

    let mut result = SpinResult::new();
    for (role, participant) in roles.iter().zip(shuffled) {
        result.assign(role.id.clone(), participant);
    }
    Ok(result)
}

/// Pick a new winner for `role_id` among participants not holding another role.
///
/// The role may keep its current winner. `current` is left untouched; the
/// caller commits the returned participant once it accepts the respin.
pub fn respin_candidate<R: Rng + ?Sized>(
    role_id: &str,
    current: &SpinResult,
    participants: &[Participant],
    roles: &[Role],
    rng: &mut R,
) -> Result<Participant> {
    if !roles.iter().any(|r| r.id == role_id) {
        return Err(SlotError::UnknownRole { role_id: role_id.to_string() });
    }

    let excluded = current.winners_excluding(role_id, roles);
    let candidates: Vec<&Participant> =
        participants.iter().filter(|p| !excluded.contains(p.id.as_str())).collect();

    candidates
        .choose(rng)
        .map(|p| (*p).clone())
        .ok_or_else(|| SlotError::NoEligibleCandidate { role_id: role_id.to_string() })
}

/// Respin one role in place. On error `current` is unchanged.
pub fn respin<R: Rng + ?Sized>(
    role_id: &str,
    current: &mut SpinResult,
    participants: &[Participant],
    roles: &[Role],
    rng: &mut R,
) -> Result<Participant> {
    let winner = respin_candidate(role_id, current, participants, roles, rng)?;
    current.assign(role_id, winner.clone());
    Ok(winner)
}
