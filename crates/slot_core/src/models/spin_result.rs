use super::{Participant, Role};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Winner label used when a role has no computed winner.
pub const UNKNOWN_WINNER: &str = "Unknown";

/// Assignment of participants to roles, keyed by role id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpinResult {
    winners: HashMap<String, Participant>,
}

/// `{role, winner}` pair handed to the announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleWinner {
    pub role: String,
    pub winner: String,
}

impl SpinResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role_id: &str) -> Option<&Participant> {
        self.winners.get(role_id)
    }

    /// Replace the winner of one role, returning the previous one.
    pub fn assign(&mut self, role_id: impl Into<String>, participant: Participant) -> Option<Participant> {
        self.winners.insert(role_id.into(), participant)
    }

    pub fn remove(&mut self, role_id: &str) -> Option<Participant> {
        self.winners.remove(role_id)
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Participant)> {
        self.winners.iter()
    }

    /// Participant ids currently holding any role other than `role_id`.
    pub fn winners_excluding<'a>(&'a self, role_id: &str, roles: &[Role]) -> HashSet<&'a str> {
        roles
            .iter()
            .filter(|r| r.id != role_id)
            .filter_map(|r| self.winners.get(&r.id))
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Winner name per role in display order, `"Unknown"` where unassigned.
    pub fn role_winners(&self, roles: &[Role]) -> Vec<RoleWinner> {
        roles
            .iter()
            .map(|r| RoleWinner {
                role: r.name.clone(),
                winner: self
                    .winners
                    .get(&r.id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| UNKNOWN_WINNER.to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> Vec<Role> {
        vec![Role::new("r1", "Host"), Role::new("r2", "Judge"), Role::new("r3", "Jester")]
    }

    #[test]
    fn test_winners_excluding_skips_target_role() {
        let mut result = SpinResult::new();
        result.assign("r1", Participant::new("a", "A"));
        result.assign("r2", Participant::new("b", "B"));

        let excluded = result.winners_excluding("r1", &roles());
        assert_eq!(excluded.len(), 1);
        assert!(excluded.contains("b"));
    }

    #[test]
    fn test_role_winners_falls_back_to_unknown() {
        let mut result = SpinResult::new();
        result.assign("r2", Participant::new("b", "B"));

        let winners = result.role_winners(&roles());
        assert_eq!(winners[0].winner, UNKNOWN_WINNER);
        assert_eq!(winners[1], RoleWinner { role: "Judge".into(), winner: "B".into() });
        assert_eq!(winners[2].role, "Jester");
    }
}
