//! Collision Resolution
//!
//! Player against static obstacles (landing and ceiling bumps), player
//! against enemies (stomp or hurt), and the lethal-contact check.
//!
//! All vertical tests are measured from edges: a landing needs the player's
//! bottom within `tolerance` of the obstacle's top, a stomp needs it within
//! `tolerance` of the enemy's top. There is no horizontal push-out.

use crate::core::rect::Rect;
use crate::game::enemy::{EnemyId, EnemyPopulation, Species};
use crate::game::events::DeathCause;
use crate::game::level::LevelLayout;
use crate::game::player::Player;

/// What happened when the player met an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleContact {
    /// Landed on top
    Landed,
    /// Hit the underside while rising
    Ceiling,
}

/// Resolve the player against every overlapping obstacle, in layout order.
///
/// Each check sees the player as left by the previous one. Returns the
/// number of landings and ceiling bumps applied.
pub fn resolve_obstacles(player: &mut Player, level: &LevelLayout, tolerance: f32) -> usize {
    let mut contacts = 0;
    for obstacle in &level.obstacles {
        if let Some(contact) = obstacle_contact(player, &obstacle.body, tolerance) {
            match contact {
                ObstacleContact::Landed => player.land_on(obstacle.body.top()),
                ObstacleContact::Ceiling => player.bump_ceiling(obstacle.body.bottom()),
            }
            contacts += 1;
        }
    }
    contacts
}

/// Classify an overlap between the player and one obstacle.
///
/// `None` for no overlap or a side overlap (left unresolved).
pub fn obstacle_contact(player: &Player, obstacle: &Rect, tolerance: f32) -> Option<ObstacleContact> {
    if !player.body.overlaps(obstacle) {
        return None;
    }

    if player.vy >= 0.0 && player.body.bottom() <= obstacle.top() + tolerance {
        Some(ObstacleContact::Landed)
    } else if player.vy < 0.0 && player.body.top() >= obstacle.bottom() - tolerance {
        Some(ObstacleContact::Ceiling)
    } else {
        None
    }
}

/// True if a body moving at `vy` qualifies as stomping `enemy`.
///
/// Overlap is not checked here.
#[inline]
pub fn is_stomp(body: &Rect, vy: f32, enemy: &Rect, tolerance: f32) -> bool {
    vy > 0.0 && body.bottom() <= enemy.top() + tolerance
}

/// An enemy removed by a stomp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stomp {
    pub species: Species,
    /// Enemy center at the moment of the stomp
    pub x: f32,
    pub y: f32,
}

/// Stomp every overlapping enemy that qualifies, then bounce.
///
/// Every enemy is judged against the velocity the player had when the pass
/// began, so several enemies landed on in one tick all die. Removal is
/// mark-then-compact; the bounce is applied once if anything was stomped.
pub fn resolve_stomps(
    player: &mut Player,
    enemies: &mut EnemyPopulation,
    tolerance: f32,
    bounce_vy: f32,
) -> Vec<Stomp> {
    let vy = player.vy;
    let mut marked: Vec<EnemyId> = Vec::new();
    let mut stomps = Vec::new();

    for (id, enemy) in enemies.iter_with_ids() {
        if player.body.overlaps(&enemy.body) && is_stomp(&player.body, vy, &enemy.body, tolerance) {
            marked.push(id);
            stomps.push(Stomp {
                species: id.species,
                x: enemy.body.center_x(),
                y: enemy.body.center_y(),
            });
        }
    }

    if !stomps.is_empty() {
        enemies.remove_marked(&marked);
        player.vy = bounce_vy;
    }

    stomps
}

/// First lethal contact for the player's current body and velocity.
///
/// Spikes are checked first and kill at any velocity. An enemy overlap is
/// lethal unless it would qualify as a stomp.
pub fn lethal_contact(
    player: &Player,
    level: &LevelLayout,
    enemies: &EnemyPopulation,
    tolerance: f32,
) -> Option<DeathCause> {
    if level.hazard_hit(&player.body).is_some() {
        return Some(DeathCause::Spike);
    }

    enemies
        .iter()
        .find(|enemy| {
            player.body.overlaps(&enemy.body)
                && !is_stomp(&player.body, player.vy, &enemy.body, tolerance)
        })
        .map(|enemy| DeathCause::Enemy(enemy.species()))
}
