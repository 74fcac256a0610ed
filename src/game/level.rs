//! Level Layout
//!
//! Static collision geometry (ground tiles and platforms), spikes and the
//! goal flag. Rebuilt wholesale from the manifest on every reset and never
//! moved afterwards; only the flag animates.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::game::config::GameConfig;
use crate::game::enemy::Animation;
use crate::game::manifest::LevelManifest;

/// Goal flag animation: frames and ticks per frame.
pub const FLAG_FRAMES: u8 = 2;
pub const FLAG_FRAME_TICKS: u8 = 15;

/// Sprite family of a static block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground,
    PlatformSmall,
    PlatformMedium,
    PlatformLarge,
}

/// Immovable block the player can stand on or bump into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Rect,
    pub kind: ObstacleKind,
}

/// Unconditionally lethal spike.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub body: Rect,
}

/// Decorative end-of-level flag.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalFlag {
    pub body: Rect,
    pub anim: Animation,
}

impl GoalFlag {
    /// Advance the flag animation by one tick.
    pub fn advance(&mut self) {
        self.anim.advance();
    }
}

/// Everything static in the level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Blocks and platforms
    pub obstacles: Vec<Obstacle>,
    /// Spikes
    pub hazards: Vec<Hazard>,
    /// Goal flag
    pub flag: GoalFlag,
    /// The global floor every body falls back to
    pub ground_top_y: f32,
}

impl LevelLayout {
    /// Build the layout described by `manifest`.
    pub fn from_manifest(manifest: &LevelManifest, config: &GameConfig) -> Self {
        let sprites = &manifest.sprites;

        let obstacles = manifest
            .obstacles
            .iter()
            .map(|spawn| {
                let size = sprites.obstacle(spawn.kind);
                Obstacle {
                    body: Rect::from_center(spawn.at.x, spawn.at.y, size.w, size.h),
                    kind: spawn.kind,
                }
            })
            .collect();

        let hazards = manifest
            .spikes
            .iter()
            .map(|at| Hazard {
                body: Rect::from_center(at.x, at.y, sprites.spike.w, sprites.spike.h),
            })
            .collect();

        let flag = GoalFlag {
            body: Rect::from_center(manifest.flag.x, manifest.flag.y, sprites.flag.w, sprites.flag.h),
            anim: Animation::new(FLAG_FRAMES, FLAG_FRAME_TICKS),
        };

        Self {
            obstacles,
            hazards,
            flag,
            ground_top_y: manifest.ground_top_y(config),
        }
    }

    /// First spike overlapping `body`, if any.
    pub fn hazard_hit(&self, body: &Rect) -> Option<&Hazard> {
        self.hazards.iter().find(|h| h.body.overlaps(body))
    }
}
