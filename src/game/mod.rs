//! Game Logic Module
//!
//! The platformer simulation. Deterministic: same manifest, config and
//! inputs give the same state hash.
//!
//! ## Module Structure
//!
//! - `config`: Tunable constants
//! - `manifest`: Level spawn records (built-in level, JSON loading)
//! - `level`: Static blocks, spikes and the goal flag
//! - `enemy`: The four enemy species and their population
//! - `coins`: Collectible coins
//! - `player`: Player body, jumping and animation
//! - `collision`: Landing, ceiling, stomp and lethal checks
//! - `camera`: Horizontal follow camera
//! - `session`: Phase machine and round state
//! - `tick`: Per-tick update and replay
//! - `input`: Per-tick input and recordings
//! - `events`: Game events
//! - `hooks`: Event delivery to audio and other collaborators
//! - `render`: Per-frame sprite snapshot

pub mod config;
pub mod manifest;
pub mod level;
pub mod enemy;
pub mod coins;
pub mod player;
pub mod collision;
pub mod camera;
pub mod session;
pub mod tick;
pub mod input;
pub mod events;
pub mod hooks;
pub mod render;

// Re-export key types
pub use config::GameConfig;
pub use manifest::LevelManifest;
pub use enemy::{Enemy, EnemyPopulation, Species};
pub use input::{InputFrame, InputRecording, JumpEdge};
pub use session::{GamePhase, MenuAction, Session, SessionCommand};
pub use tick::{step, replay_round, TickResult};
pub use events::{GameEvent, GameEventData, DeathCause};
pub use hooks::{EventSink, dispatch};
pub use render::{RenderFrame, SpriteId};
