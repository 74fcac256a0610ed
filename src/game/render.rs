//! Render Snapshot
//!
//! What a renderer needs each frame: every visible body with its sprite in
//! world coordinates, plus the camera offset and HUD values. The renderer
//! subtracts `camera_x` itself; nothing here draws.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::game::coins::CoinFrame;
use crate::game::enemy::{Enemy, Species};
use crate::game::level::ObstacleKind;
use crate::game::player::PlayerPose;
use crate::game::session::{GamePhase, Session};

/// Sprite to draw, with its animation frame resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    /// Player, frame 0 or 1
    Hero(u8),
    /// Walker, frame 0 or 1
    Walker(u8),
    /// Flyer, frame 0..3
    Flyer(u8),
    Jumper,
    /// Swooper, frame 0..3
    Swooper(u8),
    Coin(CoinFrame),
    /// Flag, frame 0 or 1
    Flag(u8),
    Obstacle(ObstacleKind),
    Spike,
}

impl SpriteId {
    /// Name of the image asset for this sprite.
    pub fn asset_name(self) -> &'static str {
        match self {
            SpriteId::Hero(f) => pick(&["hero_idle_1", "hero_idle_2"], f),
            SpriteId::Walker(f) => pick(&["enemy_walk_1", "enemy_walk_2"], f),
            SpriteId::Flyer(f) => pick(&["enemy_fly_1", "enemy_fly_2", "enemy_fly_3"], f),
            SpriteId::Jumper => "enemy_jump",
            SpriteId::Swooper(f) => pick(&["enemy_swoop_1", "enemy_swoop_2", "enemy_swoop_3"], f),
            SpriteId::Coin(CoinFrame::A) => "coin_1",
            SpriteId::Coin(CoinFrame::B) => "coin_2",
            SpriteId::Flag(f) => pick(&["flag_1", "flag_2"], f),
            SpriteId::Obstacle(ObstacleKind::Ground) => "ground",
            SpriteId::Obstacle(ObstacleKind::PlatformSmall) => "platform_small",
            SpriteId::Obstacle(ObstacleKind::PlatformMedium) => "platform_medium",
            SpriteId::Obstacle(ObstacleKind::PlatformLarge) => "platform_large",
            SpriteId::Spike => "enemy_spike",
        }
    }

    fn for_enemy(enemy: &Enemy) -> Self {
        let frame = enemy.anim.frame;
        match enemy.species() {
            Species::Walker => SpriteId::Walker(frame),
            Species::Flyer => SpriteId::Flyer(frame),
            Species::Jumper => SpriteId::Jumper,
            Species::Swooper => SpriteId::Swooper(frame),
        }
    }
}

fn pick(names: &[&'static str], frame: u8) -> &'static str {
    names[frame as usize % names.len()]
}

/// A positioned sprite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub sprite: SpriteId,
    /// World-space rectangle
    pub rect: Rect,
}

/// Everything visible on one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub phase: GamePhase,
    /// Subtract from world x to get screen x
    pub camera_x: f32,
    pub score: u32,
    pub total_coins: u32,
    pub all_coins_collected: bool,
    /// Blocks, spikes, enemies, coins, player, flag (back to front)
    pub sprites: Vec<Drawable>,
}

impl RenderFrame {
    /// Sprites whose rectangle intersects the visible window.
    pub fn visible(&self, screen_width: f32) -> impl Iterator<Item = &Drawable> + '_ {
        let left = self.camera_x;
        let right = self.camera_x + screen_width;
        self.sprites
            .iter()
            .filter(move |d| d.rect.right() > left && d.rect.left() < right)
    }
}

impl Session {
    /// Snapshot of everything the renderer draws.
    pub fn frame(&self) -> RenderFrame {
        let mut sprites = Vec::with_capacity(
            self.level.obstacles.len()
                + self.level.hazards.len()
                + self.enemies.len()
                + self.coins.len()
                + 2,
        );

        sprites.extend(self.level.obstacles.iter().map(|o| Drawable {
            sprite: SpriteId::Obstacle(o.kind),
            rect: o.body,
        }));
        sprites.extend(self.level.hazards.iter().map(|h| Drawable {
            sprite: SpriteId::Spike,
            rect: h.body,
        }));
        sprites.extend(self.enemies.iter().map(|e| Drawable {
            sprite: SpriteId::for_enemy(e),
            rect: e.body,
        }));
        sprites.extend(self.coins.coins().iter().map(|c| Drawable {
            sprite: SpriteId::Coin(self.coins.frame),
            rect: c.body,
        }));

        // Jump pose has a single frame
        let hero_frame = match self.player.pose {
            PlayerPose::Jump => 0,
            PlayerPose::Idle | PlayerPose::Run => self.player.frame(),
        };
        sprites.push(Drawable {
            sprite: SpriteId::Hero(hero_frame),
            rect: self.player.body,
        });
        sprites.push(Drawable {
            sprite: SpriteId::Flag(self.level.flag.anim.frame),
            rect: self.level.flag.body,
        });

        RenderFrame {
            phase: self.phase,
            camera_x: self.camera.offset_x,
            score: self.score,
            total_coins: self.config.total_coins,
            all_coins_collected: self.all_coins_collected,
            sprites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;

    #[test]
    fn test_frame_lists_every_body() {
        let session = Session::with_builtin_level(GameConfig::default());
        let frame = session.frame();

        // 34 blocks + 8 spikes + 12 enemies + 30 coins + player + flag
        assert_eq!(frame.sprites.len(), 86);
        assert_eq!(frame.sprites[0].sprite, SpriteId::Obstacle(ObstacleKind::Ground));
        assert_eq!(frame.sprites.last().map(|d| d.sprite), Some(SpriteId::Flag(0)));
        assert_eq!(frame.camera_x, 0.0);
        assert_eq!(frame.phase, GamePhase::Tutorial);
    }

    #[test]
    fn test_asset_names() {
        assert_eq!(SpriteId::Hero(1).asset_name(), "hero_idle_2");
        assert_eq!(SpriteId::Flyer(2).asset_name(), "enemy_fly_3");
        assert_eq!(SpriteId::Coin(CoinFrame::B).asset_name(), "coin_2");
        assert_eq!(SpriteId::Obstacle(ObstacleKind::PlatformLarge).asset_name(), "platform_large");
        assert_eq!(SpriteId::Spike.asset_name(), "enemy_spike");
        assert_eq!(SpriteId::Jumper.asset_name(), "enemy_jump");
    }

    #[test]
    fn test_visible_window() {
        let mut session = Session::with_builtin_level(GameConfig::default());
        session.camera.offset_x = 7400.0;
        let frame = session.frame();

        let visible: Vec<_> = frame.visible(800.0).collect();
        assert!(visible.iter().any(|d| matches!(d.sprite, SpriteId::Flag(_))));
        assert!(!visible.iter().any(|d| matches!(d.sprite, SpriteId::Hero(_))));
    }
}
