//! Core primitives.
//!
//! Geometry and hashing shared by every simulation module. Nothing in here
//! knows about players, enemies or levels.

pub mod rect;
pub mod hash;

// Re-export core types
pub use rect::Rect;
pub use hash::{compute_state_hash, StateHash, StateHasher};
