//! Game Events
//!
//! Fire-and-forget notifications produced during a tick. The simulation
//! never waits on or reads back anything from their consumers.

use serde::{Serialize, Deserialize};

use crate::game::enemy::Species;
use crate::game::session::GamePhase;

/// What killed the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Touched a spike
    Spike,
    /// Touched an enemy without stomping it
    Enemy(Species),
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player landed on an enemy and removed it
    EnemyStomped {
        species: Species,
        /// Enemy center at the moment of the stomp
        x: f32,
        y: f32,
    },

    /// Player picked up a coin
    CoinCollected {
        new_score: u32,
    },

    /// Player launched a jump (ground or air)
    PlayerJumped {
        jumps_left: u8,
    },

    /// Lethal contact ended the round
    PlayerDied {
        cause: DeathCause,
    },

    /// Player reached the end of the level
    LevelCompleted {
        score: u32,
        all_coins_collected: bool,
    },

    /// A fresh round began (after reset)
    RoundStarted,

    /// Music or sound effects were toggled from the menu
    SettingsChanged {
        music_on: bool,
        sounds_on: bool,
    },

    /// Session phase changed
    PhaseChanged {
        old_phase: GamePhase,
        new_phase: GamePhase,
    },
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred (0 for events outside a round)
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create enemy stomped event.
    pub fn enemy_stomped(tick: u32, species: Species, x: f32, y: f32) -> Self {
        Self::new(tick, GameEventData::EnemyStomped { species, x, y })
    }

    /// Create coin collected event.
    pub fn coin_collected(tick: u32, new_score: u32) -> Self {
        Self::new(tick, GameEventData::CoinCollected { new_score })
    }

    /// Create player jumped event.
    pub fn player_jumped(tick: u32, jumps_left: u8) -> Self {
        Self::new(tick, GameEventData::PlayerJumped { jumps_left })
    }

    /// Create player died event.
    pub fn player_died(tick: u32, cause: DeathCause) -> Self {
        Self::new(tick, GameEventData::PlayerDied { cause })
    }

    /// Create level completed event.
    pub fn level_completed(tick: u32, score: u32, all_coins_collected: bool) -> Self {
        Self::new(
            tick,
            GameEventData::LevelCompleted {
                score,
                all_coins_collected,
            },
        )
    }

    /// Create phase changed event.
    pub fn phase_changed(tick: u32, old_phase: GamePhase, new_phase: GamePhase) -> Self {
        Self::new(tick, GameEventData::PhaseChanged { old_phase, new_phase })
    }

    /// Check if this event ends the round.
    pub fn is_round_end(&self) -> bool {
        matches!(
            self.data,
            GameEventData::PlayerDied { .. } | GameEventData::LevelCompleted { .. }
        )
    }
}
