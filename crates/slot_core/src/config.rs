//! Timing configuration for the machine.
//!
//! Every duration is expressed in milliseconds of scheduler time.

use serde::{Deserialize, Serialize};
use std::{env, fs};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "VIBE_SLOT_CONFIG_PATH";

/// Upper bound for any single duration (one hour)
pub const MAX_DURATION_MS: u64 = 60 * 60 * 1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    /// How long every reel keeps cycling after a full spin starts
    pub full_spin_ms: u64,

    /// Same, for a single-role respin
    pub respin_ms: u64,

    /// Reel cycling interval
    pub tick_ms: u64,

    /// Landing delay once power is cut
    pub landing_base_ms: u64,

    /// Extra landing delay per role position on a full spin
    pub landing_stagger_ms: u64,

    /// Pause before the announcement text shows up
    pub announcement_delay_ms: u64,

    /// Time the "clear all" confirmation stays armed
    pub confirm_window_ms: u64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            full_spin_ms: 2500,
            respin_ms: 1500,
            tick_ms: 50,
            landing_base_ms: 1500,
            landing_stagger_ms: 1000,
            announcement_delay_ms: 500,
            confirm_window_ms: 3000,
        }
    }
}

impl SlotConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SlotConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
        Self::from_json(&content)
    }

    /// Load from the file named by `VIBE_SLOT_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        tracing::info!(path, "loading slot config from {CONFIG_PATH_ENV}");
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("full_spin_ms", self.full_spin_ms),
            ("respin_ms", self.respin_ms),
            ("tick_ms", self.tick_ms),
            ("landing_base_ms", self.landing_base_ms),
            ("confirm_window_ms", self.confirm_window_ms),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{name} must be > 0")));
            }
        }

        let bounded = durations.into_iter().chain([
            ("landing_stagger_ms", self.landing_stagger_ms),
            ("announcement_delay_ms", self.announcement_delay_ms),
        ]);
        for (name, value) in bounded {
            if value > MAX_DURATION_MS {
                return Err(ConfigError::Validation(format!(
                    "{name} ({value}) must be at most {MAX_DURATION_MS}"
                )));
            }
        }

        if self.tick_ms >= self.respin_ms.min(self.full_spin_ms) {
            return Err(ConfigError::Validation(format!(
                "tick_ms ({}) must be shorter than both spin durations",
                self.tick_ms
            )));
        }

        Ok(())
    }

    /// Cycling time for a round with `active_reels` reels.
    pub fn spin_duration(&self, active_reels: usize) -> u64 {
        if active_reels == 1 {
            self.respin_ms
        } else {
            self.full_spin_ms
        }
    }

    /// Landing delay for the reel at `position` among the displayed roles.
    ///
    /// A lone active reel always uses the base delay, whether it came from a
    /// respin or a full spin over a single role.
    pub fn landing_delay(&self, position: usize, active_reels: usize) -> u64 {
        if active_reels == 1 {
            self.landing_base_ms
        } else {
            let stagger = self.landing_stagger_ms.saturating_mul(position as u64);
            self.landing_base_ms.saturating_add(stagger)
        }
    }
}
