//! Level Manifest
//!
//! The fixed list of spawn records a round is built from: obstacles, spikes,
//! enemies, coins and the goal flag. The simulation only reads it at reset
//! time, so a level can be edited (or loaded from JSON) without touching any
//! update logic.
//!
//! All positions are body centers in world units. Ground tiles sit with
//! their top edge on the ground line.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::game::config::GameConfig;
use crate::game::level::ObstacleKind;

/// Errors from loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file could not be read.
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON for this schema.
    #[error("Invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A sprite size is zero, negative or not finite.
    #[error("Sprite '{0}' must have a positive size")]
    InvalidSize(&'static str),

    /// A patrol band with `left >= right`.
    #[error("{species} #{index}: patrol band [{left}, {right}] is empty")]
    InvalidPatrol {
        /// Species name
        species: &'static str,
        /// Record index within its list
        index: usize,
        /// Left bound
        left: f32,
        /// Right bound
        right: f32,
    },

    /// A direction other than -1 or +1.
    #[error("{species} #{index}: direction must be -1 or 1, got {dir}")]
    InvalidDirection {
        /// Species name
        species: &'static str,
        /// Record index within its list
        index: usize,
        /// Offending direction
        dir: i8,
    },

    /// A position, speed or wave parameter that is NaN or infinite.
    #[error("{what} #{index}: value is not finite")]
    NonFinite {
        /// Record kind
        what: &'static str,
        /// Record index within its list
        index: usize,
    },

    /// A speed that must be strictly positive is not.
    #[error("{species} #{index}: speed must be positive, got {speed}")]
    InvalidSpeed {
        /// Species name
        species: &'static str,
        /// Record index within its list
        index: usize,
        /// Offending speed
        speed: f32,
    },
}

// =============================================================================
// SPRITE SIZES
// =============================================================================

/// Width and height of a sprite, which is also its collision box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub w: f32,
    pub h: f32,
}

impl SpriteSize {
    /// Create a size.
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    fn is_valid(&self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w > 0.0 && self.h > 0.0
    }
}

/// Collision box sizes for every sprite family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    pub hero: SpriteSize,
    pub ground: SpriteSize,
    pub platform_small: SpriteSize,
    pub platform_medium: SpriteSize,
    pub platform_large: SpriteSize,
    pub spike: SpriteSize,
    pub walker: SpriteSize,
    pub flyer: SpriteSize,
    pub jumper: SpriteSize,
    pub swooper: SpriteSize,
    pub coin: SpriteSize,
    pub flag: SpriteSize,
}

impl Default for SpriteSizes {
    fn default() -> Self {
        Self {
            hero: SpriteSize::new(40.0, 48.0),
            ground: SpriteSize::new(64.0, 40.0),
            platform_small: SpriteSize::new(96.0, 24.0),
            platform_medium: SpriteSize::new(160.0, 24.0),
            platform_large: SpriteSize::new(224.0, 24.0),
            spike: SpriteSize::new(48.0, 32.0),
            walker: SpriteSize::new(44.0, 40.0),
            flyer: SpriteSize::new(48.0, 36.0),
            jumper: SpriteSize::new(50.0, 50.0),
            swooper: SpriteSize::new(52.0, 40.0),
            coin: SpriteSize::new(24.0, 24.0),
            flag: SpriteSize::new(48.0, 96.0),
        }
    }
}

impl SpriteSizes {
    /// Size of an obstacle sprite.
    pub fn obstacle(&self, kind: ObstacleKind) -> SpriteSize {
        match kind {
            ObstacleKind::Ground => self.ground,
            ObstacleKind::PlatformSmall => self.platform_small,
            ObstacleKind::PlatformMedium => self.platform_medium,
            ObstacleKind::PlatformLarge => self.platform_large,
        }
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let all = [
            ("hero", self.hero),
            ("ground", self.ground),
            ("platform_small", self.platform_small),
            ("platform_medium", self.platform_medium),
            ("platform_large", self.platform_large),
            ("spike", self.spike),
            ("walker", self.walker),
            ("flyer", self.flyer),
            ("jumper", self.jumper),
            ("swooper", self.swooper),
            ("coin", self.coin),
            ("flag", self.flag),
        ];
        for (name, size) in all {
            if !size.is_valid() {
                return Err(ManifestError::InvalidSize(name));
            }
        }
        Ok(())
    }
}

// =============================================================================
// SPAWN RECORDS
// =============================================================================

/// A point in world space (body center).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
}

impl Spawn {
    /// Create a spawn point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A static block or platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawn {
    pub kind: ObstacleKind,
    pub at: Spawn,
}

/// A patrolling ground enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkerSpawn {
    pub at: Spawn,
    pub left: f32,
    pub right: f32,
    pub dir: i8,
}

/// A patrolling airborne enemy with its own speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlyerSpawn {
    pub at: Spawn,
    pub left: f32,
    pub right: f32,
    pub dir: i8,
    pub speed: f32,
}

/// A hopping enemy; `at.y` is its rest height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumperSpawn {
    pub at: Spawn,
}

/// A sine-wave enemy anchored at `at`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwooperSpawn {
    pub at: Spawn,
    pub speed: f32,
    pub dir: i8,
    pub amplitude: f32,
    pub frequency: f32,
}

// =============================================================================
// MANIFEST
// =============================================================================

/// Everything needed to (re)build a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelManifest {
    /// Collision box sizes
    pub sprites: SpriteSizes,
    /// Player spawn (center)
    pub player_spawn: Spawn,
    /// Blocks and platforms
    pub obstacles: Vec<ObstacleSpawn>,
    /// Spikes
    pub spikes: Vec<Spawn>,
    /// Walker enemies
    pub walkers: Vec<WalkerSpawn>,
    /// Flyer enemies
    pub flyers: Vec<FlyerSpawn>,
    /// Jumper enemies
    pub jumpers: Vec<JumperSpawn>,
    /// Swooper enemies
    pub swoopers: Vec<SwooperSpawn>,
    /// Coins
    pub coins: Vec<Spawn>,
    /// Goal flag
    pub flag: Spawn,
}

impl LevelManifest {
    /// The built-in Pixel Dash level.
    ///
    /// Six sections: warm-up, platform climb, abyss, block bridge, elevated
    /// platforms and the spike run before the flag.
    pub fn pixel_dash(config: &GameConfig) -> Self {
        let sprites = SpriteSizes::default();
        let height = config.screen_height;
        let ground_y = height - sprites.ground.h;
        let ground_w = sprites.ground.w;
        let ground_cy = ground_y + sprites.ground.h / 2.0;
        let spike_cy = ground_y - sprites.spike.h / 2.0;

        let mut obstacles = Vec::new();
        let mut spikes = Vec::new();

        let ground = |x: f32| ObstacleSpawn { kind: ObstacleKind::Ground, at: Spawn::new(x, ground_cy) };
        let small = |x: f32, y: f32| ObstacleSpawn { kind: ObstacleKind::PlatformSmall, at: Spawn::new(x, y) };
        let medium = |x: f32, y: f32| ObstacleSpawn { kind: ObstacleKind::PlatformMedium, at: Spawn::new(x, y) };
        let large = |x: f32, y: f32| ObstacleSpawn { kind: ObstacleKind::PlatformLarge, at: Spawn::new(x, y) };

        // Section 1: start and warm-up
        let block_x = 400.0;
        for i in 0..5 {
            obstacles.push(ground(block_x + i as f32 * ground_w));
        }
        spikes.push(Spawn::new(block_x + 3.0 * ground_w, spike_cy));
        obstacles.push(small(block_x + 6.0 * ground_w, ground_y - 50.0));

        // Section 2: platform climb
        let climb_x = 1200.0;
        obstacles.extend([
            large(climb_x, ground_y - 100.0),
            medium(climb_x + 250.0, ground_y - 180.0),
            small(climb_x + 500.0, ground_y - 250.0),
            medium(climb_x + 700.0, ground_y - 200.0),
        ]);
        spikes.push(Spawn::new(climb_x + 250.0, ground_y - 180.0 - sprites.spike.h / 2.0));

        // Section 3: abyss
        let abyss_y = ground_y - 150.0;
        obstacles.extend([
            small(2400.0, abyss_y),
            small(2700.0, abyss_y + 50.0),
            small(3000.0, abyss_y),
            medium(3300.0, abyss_y - 50.0),
        ]);

        // Section 4: block bridge
        let bridge_x = 3600.0;
        let bridge_y = ground_y - 100.0;
        for i in 0..8 {
            let x = bridge_x + i as f32 * 100.0;
            obstacles.push(if i % 2 == 0 { medium(x, bridge_y) } else { large(x, bridge_y) });
        }
        spikes.push(Spawn::new(bridge_x + 250.0, spike_cy));
        spikes.push(Spawn::new(bridge_x + 650.0, spike_cy));

        // Section 5: elevated platforms
        let elevate_x = 5600.0;
        obstacles.extend([
            large(elevate_x, ground_y - 150.0),
            small(elevate_x + 400.0, ground_y - 200.0),
            medium(elevate_x + 700.0, ground_y - 250.0),
        ]);
        spikes.push(Spawn::new(elevate_x + 100.0, spike_cy));

        // Section 6: spike run
        let final_x = 7000.0;
        obstacles.extend([
            small(final_x - 300.0, ground_y - 100.0),
            small(final_x - 150.0, ground_y - 180.0),
            medium(final_x + 50.0, ground_y - 250.0),
        ]);
        for offset in [250.0, 350.0, 450.0] {
            spikes.push(Spawn::new(final_x + offset, spike_cy));
        }
        for i in 0..5 {
            obstacles.push(ground(final_x + 550.0 + i as f32 * ground_w));
        }
        obstacles.push(ground(config.level_length));

        // Flag stands on the final block
        let flag = Spawn::new(config.level_length, ground_y - sprites.flag.h / 2.0);

        let walkers = vec![
            WalkerSpawn { at: Spawn::new(700.0, ground_y - 20.0), left: 600.0, right: 800.0, dir: 1 },
            WalkerSpawn { at: Spawn::new(2600.0, ground_y - 20.0), left: 2500.0, right: 2700.0, dir: -1 },
            WalkerSpawn { at: Spawn::new(4000.0, ground_y - 200.0), left: 3800.0, right: 4200.0, dir: 1 },
            WalkerSpawn { at: Spawn::new(6800.0, ground_y - 20.0), left: 6600.0, right: 7000.0, dir: -1 },
        ];

        let flyers = vec![
            FlyerSpawn { at: Spawn::new(1600.0, height - 180.0), left: 1400.0, right: 1800.0, dir: 1, speed: 2.0 },
            FlyerSpawn { at: Spawn::new(3200.0, height - 120.0), left: 3000.0, right: 3400.0, dir: -1, speed: 1.5 },
            FlyerSpawn { at: Spawn::new(5200.0, height - 200.0), left: 5000.0, right: 5400.0, dir: 1, speed: 2.5 },
        ];

        let jumpers = [1000.0, 4400.0, 6200.0]
            .into_iter()
            .map(|x| JumperSpawn { at: Spawn::new(x, ground_y - 25.0) })
            .collect();

        let swoopers = vec![
            SwooperSpawn { at: Spawn::new(2000.0, height - 300.0), speed: 2.5, dir: 1, amplitude: 120.0, frequency: 0.05 },
            SwooperSpawn { at: Spawn::new(5800.0, height - 250.0), speed: 2.0, dir: -1, amplitude: 80.0, frequency: 0.04 },
        ];

        let mut coins: Vec<Spawn> = [
            (400.0, 120.0), (600.0, 200.0), (1300.0, 120.0), (1550.0, 200.0),
            (1800.0, 270.0), (2500.0, 200.0), (2800.0, 250.0), (3100.0, 200.0),
            (4750.0, 150.0), (4900.0, 200.0), (5050.0, 250.0), (5800.0, 200.0),
            (6000.0, 250.0), (6200.0, 300.0), (6800.0, 120.0), (7000.0, 200.0),
            (7200.0, 280.0),
        ]
        .into_iter()
        .map(|(x, above)| Spawn::new(x, ground_y - above))
        .collect();
        for i in 0..8 {
            coins.push(Spawn::new(3600.0 + i as f32 * 100.0, ground_y - 150.0));
        }
        for i in 0..5 {
            coins.push(Spawn::new(7500.0 + i as f32 * 100.0, ground_y - 120.0));
        }

        Self {
            player_spawn: Spawn::new(150.0, height - 100.0),
            sprites,
            obstacles,
            spikes,
            walkers,
            flyers,
            jumpers,
            swoopers,
            coins,
            flag,
        }
    }

    /// An empty level: flat ground line only, no bodies.
    ///
    /// Useful as a starting point for hand-built manifests.
    pub fn empty(config: &GameConfig) -> Self {
        Self {
            sprites: SpriteSizes::default(),
            player_spawn: Spawn::new(150.0, config.screen_height - 100.0),
            obstacles: Vec::new(),
            spikes: Vec::new(),
            walkers: Vec::new(),
            flyers: Vec::new(),
            jumpers: Vec::new(),
            swoopers: Vec::new(),
            coins: Vec::new(),
            flag: Spawn::new(config.level_length, config.screen_height / 2.0),
        }
    }

    /// Parse and validate a JSON manifest.
    pub fn from_json_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a JSON manifest file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Pretty JSON for hand editing.
    pub fn to_json_pretty(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Y of the flat ground line for a given screen height.
    pub fn ground_top_y(&self, config: &GameConfig) -> f32 {
        config.screen_height - self.sprites.ground.h
    }

    /// Check every record can build a valid body.
    pub fn validate(&self) -> Result<(), ManifestError> {
        self.sprites.validate()?;

        let points = std::iter::once(("player_spawn", 0, &self.player_spawn))
            .chain(std::iter::once(("flag", 0, &self.flag)))
            .chain(self.obstacles.iter().enumerate().map(|(i, o)| ("obstacle", i, &o.at)))
            .chain(self.spikes.iter().enumerate().map(|(i, s)| ("spike", i, s)))
            .chain(self.coins.iter().enumerate().map(|(i, c)| ("coin", i, c)))
            .chain(self.jumpers.iter().enumerate().map(|(i, j)| ("jumper", i, &j.at)));
        for (what, index, at) in points {
            if !at.is_finite() {
                return Err(ManifestError::NonFinite { what, index });
            }
        }

        for (index, w) in self.walkers.iter().enumerate() {
            check_patrol("walker", index, &w.at, w.left, w.right, w.dir)?;
        }

        for (index, f) in self.flyers.iter().enumerate() {
            check_patrol("flyer", index, &f.at, f.left, f.right, f.dir)?;
            check_speed("flyer", index, f.speed)?;
        }

        for (index, s) in self.swoopers.iter().enumerate() {
            if !(s.at.is_finite() && s.amplitude.is_finite() && s.frequency.is_finite()) {
                return Err(ManifestError::NonFinite { what: "swooper", index });
            }
            check_direction("swooper", index, s.dir)?;
            check_speed("swooper", index, s.speed)?;
        }

        Ok(())
    }

    /// Total number of enemies across all species.
    pub fn enemy_count(&self) -> usize {
        self.walkers.len() + self.flyers.len() + self.jumpers.len() + self.swoopers.len()
    }
}

fn check_patrol(
    species: &'static str,
    index: usize,
    at: &Spawn,
    left: f32,
    right: f32,
    dir: i8,
) -> Result<(), ManifestError> {
    if !(at.is_finite() && left.is_finite() && right.is_finite()) {
        return Err(ManifestError::NonFinite { what: species, index });
    }
    if left >= right {
        return Err(ManifestError::InvalidPatrol { species, index, left, right });
    }
    check_direction(species, index, dir)
}

fn check_direction(species: &'static str, index: usize, dir: i8) -> Result<(), ManifestError> {
    if dir == 1 || dir == -1 {
        Ok(())
    } else {
        Err(ManifestError::InvalidDirection { species, index, dir })
    }
}

fn check_speed(species: &'static str, index: usize, speed: f32) -> Result<(), ManifestError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ManifestError::InvalidSpeed { species, index, speed })
    }
}
