//! # Pixel Dash
//!
//! Simulation core of a 2D side-scrolling platformer: player physics,
//! collision against level geometry, four enemy species, coins, camera and
//! the session phase machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PIXEL DASH                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Primitives                               │
//! │  ├── rect.rs      - Axis-aligned rectangles                  │
//! │  └── hash.rs      - State hashing for verification           │
//! │                                                              │
//! │  game/            - Simulation (deterministic)               │
//! │  ├── config.rs    - Tunables                                 │
//! │  ├── manifest.rs  - Level spawn records                      │
//! │  ├── level.rs     - Blocks, spikes, flag                     │
//! │  ├── enemy.rs     - Walker, Flyer, Jumper, Swooper           │
//! │  ├── coins.rs     - Coin field                               │
//! │  ├── player.rs    - Player body                              │
//! │  ├── collision.rs - Landing, stomp, lethal checks            │
//! │  ├── camera.rs    - Follow camera                            │
//! │  ├── session.rs   - Phase machine                            │
//! │  ├── tick.rs      - Per-tick update, replay                  │
//! │  ├── input.rs     - Input frames and recordings              │
//! │  ├── events.rs    - Game events                              │
//! │  ├── hooks.rs     - Event sinks (audio, logs)                │
//! │  └── render.rs    - Sprite snapshot for renderers            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The simulation is single-threaded and reads no clock or randomness.
//! Given the same config, manifest and input sequence it produces the
//! same state hash on every run, which `tick::replay_round` checks.
//!
//! ## Example
//!
//! ```
//! use pixel_dash::{GameConfig, InputFrame, Session, step};
//!
//! let mut session = Session::with_builtin_level(GameConfig::default());
//! session.start_round();
//!
//! for _ in 0..60 {
//!     step(&mut session, InputFrame::with_movement(false, true));
//! }
//! assert!(session.player.x() > 150.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::rect::Rect;
pub use core::hash::StateHash;
pub use game::config::GameConfig;
pub use game::manifest::LevelManifest;
pub use game::input::{InputFrame, InputRecording};
pub use game::session::{GamePhase, MenuAction, Session};
pub use game::tick::{step, replay_round};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
