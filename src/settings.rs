//! Game settings
//!
//! Loaded from an optional JSON file. Every field has a default, so a file
//! only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed for reproducible bean lanes. Random when unset.
    pub seed: Option<u64>,

    // === Balance ===
    /// Pyoro walking speed (units per tick)
    pub player_speed: i32,
    /// Bean fall speed (units per tick)
    pub bean_fall_speed: i32,

    // === Timing ===
    /// Simulation ticks per second
    pub frame_rate_hz: u32,
    /// How long the game over screen stays up (frames)
    pub game_over_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            player_speed: PYORO_SPEED,
            bean_fall_speed: BEAN_FALL_SPEED,

            frame_rate_hz: FRAME_RATE_HZ,
            game_over_frames: GAME_OVER_FRAMES,
        }
    }
}

impl Settings {
    /// Narrowest lane (lanes 0 and 15). A faster pyoro could skip a lane.
    const MAX_PLAYER_SPEED: i32 = 8;
    /// Distance between the death and landing thresholds
    const MAX_BEAN_SPEED: i32 = BEAN_DEATH_Y - BEAN_LAND_Y;

    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, otherwise use defaults. A path that does
    /// not exist yet gets the defaults written to it.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) if !path.exists() => {
                let settings = Self::default();
                settings.save(path)?;
                Ok(settings)
            }
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check values that would break lane tracking or timing
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=Self::MAX_PLAYER_SPEED).contains(&self.player_speed) {
            return Err(SettingsError::Invalid {
                field: "player_speed",
                reason: format!(
                    "{} is outside 1..={}",
                    self.player_speed,
                    Self::MAX_PLAYER_SPEED
                ),
            });
        }
        if !(1..=Self::MAX_BEAN_SPEED).contains(&self.bean_fall_speed) {
            return Err(SettingsError::Invalid {
                field: "bean_fall_speed",
                reason: format!(
                    "{} is outside 1..={}",
                    self.bean_fall_speed,
                    Self::MAX_BEAN_SPEED
                ),
            });
        }
        if self.frame_rate_hz == 0 {
            return Err(SettingsError::Invalid {
                field: "frame_rate_hz",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Seed to use for this run
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
