//! Enemy Population
//!
//! Four species sharing a body and an animation header, each with its own
//! behavior record. Every species lives in its own typed list; collision and
//! drawing walk all of them through `EnemyPopulation::iter`.
//!
//! Positions used by the behaviors (`x`, `y`, patrol bounds, rest height,
//! swoop anchor) are body centers.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::Rect;
use crate::game::manifest::{
    FlyerSpawn, JumperSpawn, LevelManifest, SpriteSize, SwooperSpawn, WalkerSpawn,
};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Walker horizontal step per tick.
pub const WALKER_SPEED: f32 = 1.4;

/// Walker animation: frames and ticks per frame.
pub const WALKER_FRAMES: u8 = 2;
pub const WALKER_FRAME_TICKS: u8 = 10;

/// Flyer animation: frames and ticks per frame.
pub const FLYER_FRAMES: u8 = 3;
pub const FLYER_FRAME_TICKS: u8 = 8;

/// Swooper animation: frames and ticks per frame.
pub const SWOOPER_FRAMES: u8 = 3;
pub const SWOOPER_FRAME_TICKS: u8 = 8;

/// Upward speed of a Jumper launch.
pub const JUMPER_LAUNCH_SPEED: f32 = 8.0;

/// Jumpers fall under this fraction of world gravity.
pub const JUMPER_GRAVITY_SCALE: f32 = 0.6;

/// Jumps per cycle before a Jumper rests.
pub const JUMPER_JUMPS_PER_CYCLE: u8 = 2;

/// Length of a Jumper's rest, in ticks.
pub const JUMPER_REST_TICKS: u32 = 60;

/// Horizontal creep of a Jumper per tick, in every phase.
pub const JUMPER_CREEP: f32 = 1.0;

// =============================================================================
// SPECIES
// =============================================================================

/// Enemy species tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Ground patroller
    Walker,
    /// Fixed-altitude patroller
    Flyer,
    /// Hopper with a rest cycle
    Jumper,
    /// Sine-wave sweeper
    Swooper,
}

impl Species {
    /// All species, in population iteration order.
    pub const ALL: [Species; 4] = [Species::Walker, Species::Flyer, Species::Jumper, Species::Swooper];

    /// Lowercase name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Species::Walker => "walker",
            Species::Flyer => "flyer",
            Species::Jumper => "jumper",
            Species::Swooper => "swooper",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Species::Walker => 0,
            Species::Flyer => 1,
            Species::Jumper => 2,
            Species::Swooper => 3,
        }
    }
}

// =============================================================================
// SHARED HEADER
// =============================================================================

/// Frame cycler advanced once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Current frame index
    pub frame: u8,
    /// Number of frames in the cycle
    pub frame_count: u8,
    /// Ticks per frame
    pub period: u8,
    /// Ticks since the last frame change
    pub timer: u8,
}

impl Animation {
    /// A cycle of `frame_count` frames, each shown for `period` ticks.
    pub const fn new(frame_count: u8, period: u8) -> Self {
        Self {
            frame: 0,
            frame_count,
            period,
            timer: 0,
        }
    }

    /// Single-frame animation that never changes.
    pub const fn still() -> Self {
        Self::new(1, 1)
    }

    /// Advance one tick.
    pub fn advance(&mut self) {
        if self.frame_count <= 1 || self.period == 0 {
            return;
        }
        self.timer = (self.timer + 1) % self.period;
        if self.timer == 0 {
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }
}

// =============================================================================
// BEHAVIORS
// =============================================================================

/// Back-and-forth motion inside a horizontal band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub left: f32,
    pub right: f32,
    /// -1 or +1
    pub dir: i8,
    pub speed: f32,
}

impl Patrol {
    fn step(&mut self, body: &mut Rect) {
        body.translate(self.dir as f32 * self.speed, 0.0);
        let x = body.center_x();
        // Reverses after leaving the band, so it overshoots by at most one step
        if x < self.left || x > self.right {
            self.dir = -self.dir;
        }
    }
}

/// Jumper hop cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumperState {
    /// Rest height (body center y)
    pub y_start: f32,
    /// Vertical velocity while airborne
    pub vy: f32,
    /// Launches since the last rest
    pub jump_count: u8,
    /// Remaining rest ticks
    pub pause_timer: u32,
    pub airborne: bool,
}

impl JumperState {
    /// Grounded at `y_start`, ready to launch on the next tick.
    pub fn new(y_start: f32) -> Self {
        Self {
            y_start,
            vy: 0.0,
            jump_count: 0,
            pause_timer: 0,
            airborne: false,
        }
    }

    /// True while sitting out the rest pause.
    pub fn is_resting(&self) -> bool {
        self.pause_timer > 0
    }

    fn step(&mut self, body: &mut Rect, gravity: f32) {
        if self.pause_timer > 0 {
            self.pause_timer -= 1;
        } else if !self.airborne {
            self.airborne = true;
            self.vy = -JUMPER_LAUNCH_SPEED;
            self.jump_count += 1;
        }

        if self.airborne {
            let mut y = body.center_y() + self.vy;
            self.vy += gravity * JUMPER_GRAVITY_SCALE;
            if y >= self.y_start {
                y = self.y_start;
                self.airborne = false;
                if self.jump_count >= JUMPER_JUMPS_PER_CYCLE {
                    self.jump_count = 0;
                    self.pause_timer = JUMPER_REST_TICKS;
                }
            }
            body.set_center_y(y);
        }

        body.translate(JUMPER_CREEP, 0.0);
    }
}

/// Swooper sweep parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwoopState {
    /// Anchor (body center)
    pub x_start: f32,
    pub y_start: f32,
    pub speed: f32,
    /// -1 or +1, never flips
    pub dir: i8,
    pub amplitude: f32,
    /// Radians per unit of horizontal travel
    pub frequency: f32,
}

impl SwoopState {
    /// Height of the wave at horizontal position `x`.
    pub fn height_at(&self, x: f32) -> f32 {
        self.y_start + self.amplitude * ((x - self.x_start) * self.frequency).sin()
    }

    fn step(&self, body: &mut Rect) {
        body.translate(self.speed * self.dir as f32, 0.0);
        let y = self.height_at(body.center_x());
        body.set_center_y(y);
    }
}

/// Per-species behavior record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Walker(Patrol),
    Flyer(Patrol),
    Jumper(JumperState),
    Swooper(SwoopState),
}

// =============================================================================
// ENEMY
// =============================================================================

/// A live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Collision body
    pub body: Rect,
    /// Sprite cycle
    pub anim: Animation,
    /// Species payload
    pub behavior: Behavior,
}

impl Enemy {
    /// Build a Walker from its spawn record.
    pub fn walker(spawn: &WalkerSpawn, size: SpriteSize) -> Self {
        Self {
            body: Rect::from_center(spawn.at.x, spawn.at.y, size.w, size.h),
            anim: Animation::new(WALKER_FRAMES, WALKER_FRAME_TICKS),
            behavior: Behavior::Walker(Patrol {
                left: spawn.left,
                right: spawn.right,
                dir: spawn.dir,
                speed: WALKER_SPEED,
            }),
        }
    }

    /// Build a Flyer from its spawn record.
    pub fn flyer(spawn: &FlyerSpawn, size: SpriteSize) -> Self {
        Self {
            body: Rect::from_center(spawn.at.x, spawn.at.y, size.w, size.h),
            anim: Animation::new(FLYER_FRAMES, FLYER_FRAME_TICKS),
            behavior: Behavior::Flyer(Patrol {
                left: spawn.left,
                right: spawn.right,
                dir: spawn.dir,
                speed: spawn.speed,
            }),
        }
    }

    /// Build a Jumper resting at its spawn height.
    pub fn jumper(spawn: &JumperSpawn, size: SpriteSize) -> Self {
        Self {
            body: Rect::from_center(spawn.at.x, spawn.at.y, size.w, size.h),
            anim: Animation::still(),
            behavior: Behavior::Jumper(JumperState::new(spawn.at.y)),
        }
    }

    /// Build a Swooper anchored at its spawn point.
    pub fn swooper(spawn: &SwooperSpawn, size: SpriteSize) -> Self {
        Self {
            body: Rect::from_center(spawn.at.x, spawn.at.y, size.w, size.h),
            anim: Animation::new(SWOOPER_FRAMES, SWOOPER_FRAME_TICKS),
            behavior: Behavior::Swooper(SwoopState {
                x_start: spawn.at.x,
                y_start: spawn.at.y,
                speed: spawn.speed,
                dir: spawn.dir,
                amplitude: spawn.amplitude,
                frequency: spawn.frequency,
            }),
        }
    }

    /// Species tag of this enemy.
    pub fn species(&self) -> Species {
        match self.behavior {
            Behavior::Walker(_) => Species::Walker,
            Behavior::Flyer(_) => Species::Flyer,
            Behavior::Jumper(_) => Species::Jumper,
            Behavior::Swooper(_) => Species::Swooper,
        }
    }

    /// Advance behavior and animation by one tick.
    pub fn advance(&mut self, gravity: f32) {
        match &mut self.behavior {
            Behavior::Walker(patrol) | Behavior::Flyer(patrol) => patrol.step(&mut self.body),
            Behavior::Jumper(state) => state.step(&mut self.body, gravity),
            Behavior::Swooper(state) => state.step(&mut self.body),
        }
        self.anim.advance();
    }
}

// =============================================================================
// POPULATION
// =============================================================================

/// Stable handle to an enemy within one tick (species + list index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId {
    pub species: Species,
    pub index: usize,
}

/// All live enemies, one typed list per species.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyPopulation {
    walkers: Vec<Enemy>,
    flyers: Vec<Enemy>,
    jumpers: Vec<Enemy>,
    swoopers: Vec<Enemy>,
}

impl EnemyPopulation {
    /// Empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every enemy listed in the manifest.
    pub fn from_manifest(manifest: &LevelManifest) -> Self {
        let sprites = &manifest.sprites;
        Self {
            walkers: manifest.walkers.iter().map(|s| Enemy::walker(s, sprites.walker)).collect(),
            flyers: manifest.flyers.iter().map(|s| Enemy::flyer(s, sprites.flyer)).collect(),
            jumpers: manifest.jumpers.iter().map(|s| Enemy::jumper(s, sprites.jumper)).collect(),
            swoopers: manifest.swoopers.iter().map(|s| Enemy::swooper(s, sprites.swooper)).collect(),
        }
    }

    /// Add an enemy to its species list.
    pub fn push(&mut self, enemy: Enemy) {
        self.list_mut(enemy.species()).push(enemy);
    }

    /// Enemies of one species.
    pub fn species(&self, species: Species) -> &[Enemy] {
        match species {
            Species::Walker => &self.walkers,
            Species::Flyer => &self.flyers,
            Species::Jumper => &self.jumpers,
            Species::Swooper => &self.swoopers,
        }
    }

    fn list_mut(&mut self, species: Species) -> &mut Vec<Enemy> {
        match species {
            Species::Walker => &mut self.walkers,
            Species::Flyer => &mut self.flyers,
            Species::Jumper => &mut self.jumpers,
            Species::Swooper => &mut self.swoopers,
        }
    }

    /// All enemies, species by species.
    pub fn iter(&self) -> impl Iterator<Item = &Enemy> + '_ {
        self.walkers
            .iter()
            .chain(&self.flyers)
            .chain(&self.jumpers)
            .chain(&self.swoopers)
    }

    /// All enemies with their handles.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (EnemyId, &Enemy)> + '_ {
        Species::ALL.into_iter().flat_map(move |species| {
            self.species(species)
                .iter()
                .enumerate()
                .map(move |(index, enemy)| (EnemyId { species, index }, enemy))
        })
    }

    /// Look up an enemy by handle.
    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.species(id.species).get(id.index)
    }

    /// Total number of live enemies.
    pub fn len(&self) -> usize {
        self.walkers.len() + self.flyers.len() + self.jumpers.len() + self.swoopers.len()
    }

    /// Check if every enemy is gone.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every marked enemy in one compaction pass per species.
    ///
    /// Handles must come from the current population; returns the number
    /// removed.
    pub fn remove_marked(&mut self, marked: &[EnemyId]) -> usize {
        if marked.is_empty() {
            return 0;
        }
        let before = self.len();
        for species in Species::ALL {
            let mut index = 0;
            self.list_mut(species).retain(|_| {
                let keep = !marked.contains(&EnemyId { species, index });
                index += 1;
                keep
            });
        }
        before - self.len()
    }

    /// Advance every enemy by one tick.
    pub fn advance(&mut self, gravity: f32) {
        for species in Species::ALL {
            for enemy in self.list_mut(species).iter_mut() {
                enemy.advance(gravity);
            }
        }
    }

    /// Feed population state into a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for species in Species::ALL {
            let list = self.species(species);
            hasher.update_u8(species.to_u8());
            hasher.update_u32(list.len() as u32);
            for enemy in list {
                hasher.update_rect(&enemy.body);
                hasher.update_u8(enemy.anim.frame);
                hasher.update_u8(enemy.anim.timer);
                match &enemy.behavior {
                    Behavior::Walker(p) | Behavior::Flyer(p) => hasher.update_i8(p.dir),
                    Behavior::Jumper(j) => {
                        hasher.update_f32(j.vy);
                        hasher.update_u8(j.jump_count);
                        hasher.update_u32(j.pause_timer);
                        hasher.update_bool(j.airborne);
                    }
                    Behavior::Swooper(_) => {}
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::GameConfig;
    use crate::game::manifest::{Spawn, SpriteSizes};

    const GRAVITY: f32 = 0.6;

    fn jumper_at(x: f32, y: f32) -> Enemy {
        Enemy::jumper(&JumperSpawn { at: Spawn::new(x, y) }, SpriteSizes::default().jumper)
    }

    fn jumper_state(enemy: &Enemy) -> JumperState {
        match enemy.behavior {
            Behavior::Jumper(state) => state,
            _ => panic!("not a jumper"),
        }
    }

    #[test]
    fn test_walker_reverses_outside_band() {
        let spawn = WalkerSpawn { at: Spawn::new(799.0, 540.0), left: 600.0, right: 800.0, dir: 1 };
        let mut walker = Enemy::walker(&spawn, SpriteSizes::default().walker);

        walker.advance(GRAVITY);
        // 799 + 1.4 is past the right bound: direction flips after the move
        assert!(walker.body.center_x() > 800.0);
        assert!(matches!(walker.behavior, Behavior::Walker(Patrol { dir: -1, .. })));

        walker.advance(GRAVITY);
        assert!(walker.body.center_x() < 800.0);
    }

    #[test]
    fn test_walker_animation_period() {
        let spawn = WalkerSpawn { at: Spawn::new(700.0, 540.0), left: 600.0, right: 800.0, dir: 1 };
        let mut walker = Enemy::walker(&spawn, SpriteSizes::default().walker);

        for _ in 0..9 {
            walker.advance(GRAVITY);
        }
        assert_eq!(walker.anim.frame, 0);
        walker.advance(GRAVITY);
        assert_eq!(walker.anim.frame, 1);
        for _ in 0..10 {
            walker.advance(GRAVITY);
        }
        assert_eq!(walker.anim.frame, 0);
    }

    #[test]
    fn test_flyer_keeps_altitude() {
        let spawn = FlyerSpawn { at: Spawn::new(1600.0, 420.0), left: 1400.0, right: 1800.0, dir: 1, speed: 2.5 };
        let mut flyer = Enemy::flyer(&spawn, SpriteSizes::default().flyer);

        for _ in 0..500 {
            flyer.advance(GRAVITY);
            assert_eq!(flyer.body.center_y(), 420.0);
            // Never drifts more than one step outside the band
            assert!(flyer.body.center_x() >= 1400.0 - 2.5 - 1e-3);
            assert!(flyer.body.center_x() <= 1800.0 + 2.5 + 1e-3);
        }
    }

    #[test]
    fn test_flyer_three_frame_cycle() {
        let spawn = FlyerSpawn { at: Spawn::new(1600.0, 420.0), left: 1400.0, right: 1800.0, dir: 1, speed: 2.0 };
        let mut flyer = Enemy::flyer(&spawn, SpriteSizes::default().flyer);

        let mut frames = Vec::new();
        for _ in 0..24 {
            flyer.advance(GRAVITY);
            frames.push(flyer.anim.frame);
        }
        assert_eq!(frames[7], 1);
        assert_eq!(frames[15], 2);
        assert_eq!(frames[23], 0);
    }

    #[test]
    fn test_jumper_launches_on_first_tick() {
        let mut jumper = jumper_at(1000.0, 535.0);
        jumper.advance(GRAVITY);

        let state = jumper_state(&jumper);
        assert!(state.airborne);
        assert_eq!(state.jump_count, 1);
        assert_eq!(jumper.body.center_y(), 527.0);
        assert_eq!(jumper.body.center_x(), 1001.0);
    }

    #[test]
    fn test_jumper_rests_exactly_sixty_ticks() {
        let mut jumper = jumper_at(1000.0, 535.0);
        let mut launches = Vec::new();
        let mut rest_started = None;

        for tick in 0..400u32 {
            let before = jumper_state(&jumper);
            jumper.advance(GRAVITY);
            let after = jumper_state(&jumper);

            if after.jump_count > before.jump_count {
                launches.push(tick);
            }
            if after.pause_timer == JUMPER_REST_TICKS {
                rest_started.get_or_insert(tick);
            }
            assert!(after.jump_count <= JUMPER_JUMPS_PER_CYCLE);
        }

        // Back-to-back hops, then a rest, then the next cycle
        assert!(launches.len() >= 3);
        let landed = rest_started.unwrap();
        let relaunch = launches[2];
        assert_eq!(relaunch - landed - 1, JUMPER_REST_TICKS);
    }

    #[test]
    fn test_jumper_lands_on_rest_height() {
        let mut jumper = jumper_at(1000.0, 535.0);
        for _ in 0..200 {
            jumper.advance(GRAVITY);
            assert!(jumper.body.center_y() <= 535.0);
            if !jumper_state(&jumper).airborne {
                assert_eq!(jumper.body.center_y(), 535.0);
            }
        }
    }

    #[test]
    fn test_jumper_creeps_every_tick() {
        let mut jumper = jumper_at(0.0, 535.0);
        for _ in 0..150 {
            jumper.advance(GRAVITY);
        }
        assert_eq!(jumper.body.center_x(), 150.0);
    }

    #[test]
    fn test_swooper_height_is_function_of_x() {
        let spawn = SwooperSpawn {
            at: Spawn::new(2000.0, 300.0),
            speed: 2.5,
            dir: 1,
            amplitude: 120.0,
            frequency: 0.05,
        };
        let mut swooper = Enemy::swooper(&spawn, SpriteSizes::default().swooper);

        for _ in 0..1000 {
            swooper.advance(GRAVITY);
            let Behavior::Swooper(state) = swooper.behavior else { unreachable!() };
            let expected = state.height_at(swooper.body.center_x());
            assert!((swooper.body.center_y() - expected).abs() < 1e-3);
            assert!((swooper.body.center_y() - 300.0).abs() <= 120.0 + 1e-3);
        }

        // Never reverses
        assert!(swooper.body.center_x() > 2000.0 + 2400.0);
    }

    #[test]
    fn test_population_from_builtin_manifest() {
        let manifest = LevelManifest::pixel_dash(&GameConfig::default());
        let population = EnemyPopulation::from_manifest(&manifest);

        assert_eq!(population.len(), 12);
        assert_eq!(population.species(Species::Walker).len(), 4);
        assert_eq!(population.species(Species::Swooper).len(), 2);

        let order: Vec<Species> = population.iter().map(|e| e.species()).collect();
        assert_eq!(order.first(), Some(&Species::Walker));
        assert_eq!(order.last(), Some(&Species::Swooper));
    }

    #[test]
    fn test_remove_marked_compacts_each_list() {
        let manifest = LevelManifest::pixel_dash(&GameConfig::default());
        let mut population = EnemyPopulation::from_manifest(&manifest);

        let third_flyer = population.species(Species::Flyer)[2];
        let marked = [
            EnemyId { species: Species::Walker, index: 0 },
            EnemyId { species: Species::Walker, index: 1 },
            EnemyId { species: Species::Flyer, index: 1 },
        ];
        assert_eq!(population.remove_marked(&marked), 3);

        assert_eq!(population.len(), 9);
        assert_eq!(population.species(Species::Walker).len(), 2);
        // Survivors keep their relative order
        assert_eq!(population.species(Species::Flyer)[1], third_flyer);
        assert_eq!(population.remove_marked(&[]), 0);
    }

    #[test]
    fn test_iter_with_ids_round_trips_through_get() {
        let manifest = LevelManifest::pixel_dash(&GameConfig::default());
        let population = EnemyPopulation::from_manifest(&manifest);

        for (id, enemy) in population.iter_with_ids() {
            assert_eq!(population.get(id), Some(enemy));
            assert_eq!(enemy.species(), id.species);
        }
    }
}
