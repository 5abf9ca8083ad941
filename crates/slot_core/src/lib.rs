//! # slot_core - Raffle Slot Machine Engine
//!
//! Randomly assigns named participants to named roles and sequences the
//! "spinning reel" presentation around each draw.
//!
//! ## Features
//! - Unbiased full spins (Fisher-Yates) and per-role respins
//! - Per-reel cycling and staggered landings on a virtual-time scheduler
//! - Round barrier that declares a result only after every active reel lands
//! - Seeded RNG: same seed, same draws

pub mod announcement;
pub mod api;
pub mod assignment;
pub mod barrier;
pub mod config;
pub mod confirm;
pub mod error;
pub mod events;
pub mod machine;
pub mod models;
pub mod reel;
pub mod registry;
pub mod scheduler;
pub mod sequencer;

pub use api::{play_round, play_round_json, PlayRoundRequest, PlayRoundResponse};
pub use config::{ConfigError, SlotConfig};
pub use error::{Result, SlotError};
pub use events::{Notice, SlotEvent};
pub use machine::{ClearOutcome, MachineSnapshot, ReelView, SlotMachine};
pub use models::{GameState, Participant, Role, RoleWinner, SpinResult};
pub use reel::ReelLabel;
pub use registry::Registry;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
