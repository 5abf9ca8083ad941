//! Participant and role collections
//!
//! Both lists are ordered: participant order drives reel cycling, role order
//! drives assignment and the landing stagger.

use crate::error::{Result, SlotError};
use crate::models::{Participant, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DEFAULT_PARTICIPANTS: [&str; 11] = [
    "Il Conte di Arcore",
    "Rayan Gosling",
    "Michael Jackson",
    "Polymarket Specialist",
    "Oh Yang",
    "Meme Master",
    "Leoliviericlerc",
    "Dynantico",
    "Neozelandese",
    "Una Gioia",
    "Ash Manduca",
];

const DEFAULT_ROLES: [&str; 2] = ["Moderator", "Notary"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    participants: Vec<Participant>,
    roles: Vec<Role>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from pre-made lists. Ids must be unique within each list.
    pub fn from_parts(participants: Vec<Participant>, roles: Vec<Role>) -> Result<Self> {
        ensure_unique(participants.iter().map(|p| p.id.as_str()))?;
        ensure_unique(roles.iter().map(|r| r.id.as_str()))?;
        Ok(Self { participants, roles })
    }

    /// Sample roster the machine boots with
    pub fn with_defaults() -> Self {
        let participants = DEFAULT_PARTICIPANTS
            .iter()
            .enumerate()
            .map(|(i, name)| Participant::new((i + 1).to_string(), *name))
            .collect();
        let roles = DEFAULT_ROLES
            .iter()
            .enumerate()
            .map(|(i, name)| Role::new(format!("r{}", i + 1), *name))
            .collect();
        Self { participants, roles }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn role_position(&self, role_id: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.id == role_id)
    }

    /// Add every name found in `raw`, split on commas and newlines.
    ///
    /// Blank entries are skipped; returns the participants actually added.
    pub fn add_participants(&mut self, raw: &str) -> Vec<Participant> {
        let added: Vec<Participant> = parse_names(raw).map(Participant::named).collect();
        self.participants.extend(added.iter().cloned());
        added
    }

    pub fn remove_participant(&mut self, id: &str) -> Option<Participant> {
        let idx = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(idx))
    }

    pub fn clear_participants(&mut self) -> usize {
        let count = self.participants.len();
        self.participants.clear();
        count
    }

    pub fn add_role(&mut self, name: &str) -> Result<Role> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SlotError::EmptyName);
        }
        let role = Role::named(name);
        self.roles.push(role.clone());
        Ok(role)
    }

    pub fn remove_role(&mut self, role_id: &str) -> Result<Role> {
        let idx = self
            .role_position(role_id)
            .ok_or_else(|| SlotError::UnknownRole { role_id: role_id.to_string() })?;
        Ok(self.roles.remove(idx))
    }

    /// Rename in place. The name is kept verbatim, as typed.
    pub fn rename_role(&mut self, role_id: &str, name: &str) -> Result<()> {
        let role = self
            .roles
            .iter_mut()
            .find(|r| r.id == role_id)
            .ok_or_else(|| SlotError::UnknownRole { role_id: role_id.to_string() })?;
        role.name = name.to_string();
        Ok(())
    }
}

pub(crate) fn parse_names(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(['\n', ',']).map(str::trim).filter(|n| !n.is_empty())
}

fn ensure_unique<'a>(ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SlotError::DuplicateId { id: id.to_string() });
        }
    }
    Ok(())
}
