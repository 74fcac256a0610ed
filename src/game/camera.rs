//! Horizontal follow camera.

use serde::{Serialize, Deserialize};

/// One-dimensional camera window; the renderer subtracts `offset_x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World x of the left screen edge, never negative
    pub offset_x: f32,
}

impl Camera {
    /// Camera at the start of the level.
    pub const fn new() -> Self {
        Self { offset_x: 0.0 }
    }

    /// Keep the player `lead × screen_width` from the left edge.
    pub fn follow(&mut self, player_x: f32, screen_width: f32, lead: f32) {
        self.offset_x = (player_x - screen_width * lead).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamped_at_level_start() {
        let mut camera = Camera::new();
        camera.follow(150.0, 800.0, 0.4);
        assert_eq!(camera.offset_x, 0.0);
    }

    #[test]
    fn test_follows_past_lead() {
        let mut camera = Camera::new();
        camera.follow(1000.0, 800.0, 0.4);
        assert_eq!(camera.offset_x, 680.0);
    }

    proptest! {
        #[test]
        fn prop_offset_formula(x in -1000.0f32..20000.0) {
            let mut camera = Camera::new();
            camera.follow(x, 800.0, 0.4);
            prop_assert!(camera.offset_x >= 0.0);
            prop_assert_eq!(camera.offset_x, (x - 800.0 * 0.4).max(0.0));
        }
    }
}
