use serde::{Deserialize, Serialize};
use std::fmt;

/// Global phase of the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    #[default]
    Idle,
    Spinning,
    Stopping,
    Result,
}

impl GameState {
    /// A round is in flight; spin buttons and registry edits are disabled.
    pub fn is_active(&self) -> bool {
        matches!(self, GameState::Spinning | GameState::Stopping)
    }

    /// A new round may start from here.
    pub fn accepts_spin(&self) -> bool {
        matches!(self, GameState::Idle | GameState::Result)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            GameState::Idle => "IDLE",
            GameState::Spinning => "SPINNING",
            GameState::Stopping => "STOPPING",
            GameState::Result => "RESULT",
        };
        write!(f, "{}", label)
    }
}
