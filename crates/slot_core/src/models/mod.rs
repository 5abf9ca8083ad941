pub mod game_state;
pub mod participant;
pub mod role;
pub mod spin_result;

pub use game_state::GameState;
pub use participant::Participant;
pub use role::Role;
pub use spin_result::{RoleWinner, SpinResult, UNKNOWN_WINNER};
