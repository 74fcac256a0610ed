//! Axis-Aligned Rectangles
//!
//! The single body shape used for every gameplay entity: player, enemies,
//! coins, blocks, spikes and the goal flag.
//!
//! World units are pixels, x grows to the right and y grows downward, so
//! `top < bottom` for any rectangle with a positive height.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Axis-aligned rectangle stored as top-left corner plus size.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a rectangle centered on `(cx, cy)`.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.center_x(), self.center_y())
    }

    /// Move vertically so the bottom edge sits at `bottom`.
    #[inline]
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    /// Move vertically so the top edge sits at `top`.
    #[inline]
    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    /// Move horizontally so the center sits at `cx`.
    #[inline]
    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.w / 2.0;
    }

    /// Move vertically so the center sits at `cy`.
    #[inline]
    pub fn set_center_y(&mut self, cy: f32) {
        self.y = cy - self.h / 2.0;
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Check if two rectangles overlap.
    ///
    /// Strict on all four sides: rectangles that only share an edge do not
    /// overlap. A player standing exactly on a block is therefore not in
    /// contact with it.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if a point lies inside (left/top inclusive, right/bottom exclusive).
    #[inline]
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    /// Width and height are both strictly positive and finite.
    #[inline]
    pub fn has_valid_size(&self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w > 0.0 && self.h > 0.0
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({:.2}, {:.2}, {:.2}x{:.2})", self.x, self.y, self.w, self.h)
    }
}
