use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("Need at least {needed} participants to fill all roles, found {available}")]
    InsufficientParticipants { needed: usize, available: usize },

    #[error("No roles configured")]
    NoRolesConfigured,

    #[error("No available participants left to switch to for role {role_id}")]
    NoEligibleCandidate { role_id: String },

    #[error("Role not found: {role_id}")]
    UnknownRole { role_id: String },

    #[error("A round is already in progress")]
    SpinInProgress,

    #[error("Registry is locked while the reels are spinning")]
    RegistryLocked,

    #[error("Duplicate id: {id}")]
    DuplicateId { id: String },

    #[error("Name must not be blank")]
    EmptyName,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SlotError {
    /// Validation errors raised by user input; the caller reports them and
    /// waits for the registry to change before retrying.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            SlotError::InsufficientParticipants { .. }
                | SlotError::NoRolesConfigured
                | SlotError::NoEligibleCandidate { .. }
                | SlotError::EmptyName
                | SlotError::DuplicateId { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
