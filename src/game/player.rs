//! Player Body
//!
//! Horizontal input motion, gravity, the global ground clamp, the double
//! jump budget and the pose/animation cycle. Collision against obstacles
//! and enemies lives in `collision`.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::game::input::InputFrame;
use crate::game::manifest::LevelManifest;

/// Launches available between ground contacts.
pub const MAX_JUMPS: u8 = 2;

/// Length of the player animation counter cycle.
pub const ANIM_CYCLE: u8 = 10;

/// What the player sprite is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPose {
    #[default]
    Idle,
    Run,
    Jump,
}

impl PlayerPose {
    /// Frames in this pose's cycle.
    pub fn frame_count(self) -> u8 {
        match self {
            PlayerPose::Idle | PlayerPose::Run => 2,
            PlayerPose::Jump => 1,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            PlayerPose::Idle => 0,
            PlayerPose::Run => 1,
            PlayerPose::Jump => 2,
        }
    }
}

/// The controlled body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Collision body
    pub body: Rect,
    /// Vertical velocity (positive is downward)
    pub vy: f32,
    /// Standing on the ground line or a platform this tick
    pub on_ground: bool,
    /// Remaining jumps, 0..=MAX_JUMPS
    pub jumps_left: u8,
    /// Current sprite pose
    pub pose: PlayerPose,
    /// Animation counter, 0..ANIM_CYCLE
    pub anim_timer: u8,
}

impl Player {
    /// Player at the manifest spawn point, grounded with a full jump budget.
    pub fn spawn(manifest: &LevelManifest) -> Self {
        let size = manifest.sprites.hero;
        let at = manifest.player_spawn;
        Self {
            body: Rect::from_center(at.x, at.y, size.w, size.h),
            vy: 0.0,
            on_ground: true,
            jumps_left: MAX_JUMPS,
            pose: PlayerPose::Idle,
            anim_timer: 0,
        }
    }

    /// Horizontal position (body center), used for camera and completion.
    #[inline]
    pub fn x(&self) -> f32 {
        self.body.center_x()
    }

    /// Launch upward if any jumps remain.
    ///
    /// Returns true if the jump happened.
    pub fn try_jump(&mut self, jump_power: f32) -> bool {
        if self.jumps_left == 0 {
            return false;
        }
        self.vy = -jump_power;
        self.jumps_left -= 1;
        true
    }

    /// Step left and/or right; opposite keys cancel.
    pub fn move_horizontal(&mut self, input: InputFrame, speed: f32) {
        if input.left() {
            self.body.translate(-speed, 0.0);
        }
        if input.right() {
            self.body.translate(speed, 0.0);
        }
    }

    /// Apply gravity and vertical velocity.
    ///
    /// Clears `on_ground`; the clamp and landing passes set it again.
    pub fn integrate(&mut self, gravity: f32) {
        self.on_ground = false;
        self.vy += gravity;
        self.body.translate(0.0, self.vy);
    }

    /// Snap onto the global ground line if at or below it.
    ///
    /// Returns true if the clamp fired. Idempotent.
    pub fn clamp_to_ground(&mut self, ground_top_y: f32) -> bool {
        if self.body.bottom() >= ground_top_y {
            self.land_on(ground_top_y);
            true
        } else {
            false
        }
    }

    /// Stand on a surface whose top edge is `top`.
    pub fn land_on(&mut self, top: f32) {
        self.body.set_bottom(top);
        self.vy = 0.0;
        self.on_ground = true;
        self.jumps_left = MAX_JUMPS;
    }

    /// Stop against a ceiling whose bottom edge is `bottom`.
    pub fn bump_ceiling(&mut self, bottom: f32) {
        self.body.set_top(bottom);
        self.vy = 0.0;
    }

    /// Advance the animation counter and pick the pose.
    pub fn animate(&mut self, moving: bool) {
        self.anim_timer = (self.anim_timer + 1) % ANIM_CYCLE;
        self.pose = match (self.on_ground, moving) {
            (true, true) => PlayerPose::Run,
            (true, false) => PlayerPose::Idle,
            (false, _) => PlayerPose::Jump,
        };
    }

    /// Frame index within the current pose.
    pub fn frame(&self) -> u8 {
        self.anim_timer % self.pose.frame_count()
    }

    /// Feed player state into a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_rect(&self.body);
        hasher.update_f32(self.vy);
        hasher.update_bool(self.on_ground);
        hasher.update_u8(self.jumps_left);
        hasher.update_u8(self.pose.to_u8());
        hasher.update_u8(self.anim_timer);
    }
}
