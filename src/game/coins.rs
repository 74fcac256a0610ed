//! Coin Field
//!
//! Collectible coins sharing one two-frame blink. The shared frame flips
//! every `COIN_FRAME_TICKS` ticks while any coin remains.

use serde::{Serialize, Deserialize};

use crate::core::rect::Rect;
use crate::game::manifest::LevelManifest;

/// Ticks between blink frame changes.
pub const COIN_FRAME_TICKS: u32 = 10;

/// Shared blink frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoinFrame {
    #[default]
    A,
    B,
}

impl CoinFrame {
    /// The other frame.
    pub fn flipped(self) -> Self {
        match self {
            CoinFrame::A => CoinFrame::B,
            CoinFrame::B => CoinFrame::A,
        }
    }
}

/// A collectible coin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub body: Rect,
}

/// All remaining coins and their shared animation state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoinField {
    coins: Vec<Coin>,
    /// Current blink frame of every coin
    pub frame: CoinFrame,
    /// Ticks since the last frame change
    pub timer: u32,
}

impl CoinField {
    /// Build every coin listed in the manifest.
    pub fn from_manifest(manifest: &LevelManifest) -> Self {
        let size = manifest.sprites.coin;
        Self {
            coins: manifest
                .coins
                .iter()
                .map(|at| Coin {
                    body: Rect::from_center(at.x, at.y, size.w, size.h),
                })
                .collect(),
            frame: CoinFrame::A,
            timer: 0,
        }
    }

    /// Remaining coins.
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Number of remaining coins.
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Check if every coin has been collected.
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Remove every coin overlapping `body`; returns how many were removed.
    pub fn collect_overlapping(&mut self, body: &Rect) -> u32 {
        let before = self.coins.len();
        self.coins.retain(|coin| !coin.body.overlaps(body));
        (before - self.coins.len()) as u32
    }

    /// Advance the shared blink by one tick.
    pub fn animate(&mut self) {
        self.timer += 1;
        if self.timer >= COIN_FRAME_TICKS {
            self.timer = 0;
            if !self.coins.is_empty() {
                self.frame = self.frame.flipped();
            }
        }
    }
}
