//! Game Tunables
//!
//! Named constants consumed read-only by the simulation. `Default` yields the
//! shipped values; `from_env` lets a harness override the physics knobs
//! without a rebuild.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::warn;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "PIXEL_DASH_";

/// Errors from validating a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive is not.
    #[error("{name} must be positive and finite, got {value}")]
    NotPositive {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// A ratio outside `0.0..=1.0`.
    #[error("{name} must be within 0..=1, got {value}")]
    OutOfUnitRange {
        /// Field name
        name: &'static str,
        /// Offending value
        value: f32,
    },

    /// Total coin count of zero.
    #[error("total_coins must be at least 1")]
    NoCoins,
}

/// Simulation tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Viewport width (camera lead is a fraction of this)
    pub screen_width: f32,
    /// Viewport height (ground line and spawn heights derive from this)
    pub screen_height: f32,
    /// Downward acceleration added to vertical velocity every tick
    pub gravity: f32,
    /// Horizontal step per tick per active direction key
    pub player_speed: f32,
    /// Upward launch velocity of a jump
    pub jump_power: f32,
    /// Player x at which the level is complete
    pub level_length: f32,
    /// Coins needed for the "all coins collected" ending
    pub total_coins: u32,
    /// Vertical slack for landing, ceiling and stomp checks
    pub collision_tolerance: f32,
    /// Fraction of `jump_power` used as the stomp bounce
    pub stomp_bounce: f32,
    /// Fraction of the screen width kept ahead of the camera's left edge
    pub camera_lead: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            gravity: 0.6,
            player_speed: 4.0,
            jump_power: 12.0,
            level_length: 8000.0,
            total_coins: 30,
            collision_tolerance: 10.0,
            stomp_bounce: 0.7,
            camera_lead: 0.4,
        }
    }
}

impl GameConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables keep their default. Unparseable values are logged
    /// and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (keys include `ENV_PREFIX`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_f32(&lookup, "GRAVITY", &mut config.gravity);
        override_f32(&lookup, "PLAYER_SPEED", &mut config.player_speed);
        override_f32(&lookup, "JUMP_POWER", &mut config.jump_power);
        override_f32(&lookup, "LEVEL_LENGTH", &mut config.level_length);
        override_f32(&lookup, "SCREEN_WIDTH", &mut config.screen_width);
        override_f32(&lookup, "SCREEN_HEIGHT", &mut config.screen_height);

        let key = format!("{ENV_PREFIX}TOTAL_COINS");
        if let Some(raw) = lookup(&key) {
            match raw.trim().parse::<u32>() {
                Ok(value) => config.total_coins = value,
                Err(_) => warn!("Ignoring {}={:?}: not an unsigned integer", key, raw),
            }
        }

        config
    }

    /// Check every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("jump_power", self.jump_power),
            ("level_length", self.level_length),
            ("collision_tolerance", self.collision_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        for (name, value) in [("stomp_bounce", self.stomp_bounce), ("camera_lead", self.camera_lead)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        if self.total_coins == 0 {
            return Err(ConfigError::NoCoins);
        }

        Ok(())
    }

    /// Vertical velocity given to the player by a stomp.
    #[inline]
    pub fn stomp_velocity(&self) -> f32 {
        -self.jump_power * self.stomp_bounce
    }
}

fn override_f32<F>(lookup: &F, name: &str, slot: &mut f32)
where
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{ENV_PREFIX}{name}");
    if let Some(raw) = lookup(&key) {
        match raw.trim().parse::<f32>() {
            Ok(value) => *slot = value,
            Err(_) => warn!("Ignoring {}={:?}: not a number", key, raw),
        }
    }
}
