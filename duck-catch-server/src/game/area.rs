//! Play Area Geometry
//!
//! Bounds within which ducks are placed. A duck's position is the top-left
//! corner of its sprite, so the usable range is shrunk by the sprite size
//! plus a margin on both sides.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;

/// Default play area width in pixels.
pub const DEFAULT_AREA_WIDTH: f32 = 800.0;

/// Default play area height in pixels.
pub const DEFAULT_AREA_HEIGHT: f32 = 500.0;

/// Duck sprite edge length in pixels.
pub const DUCK_SIZE: f32 = 64.0;

/// Gap kept between a sprite and the play area edge.
pub const DUCK_MARGIN: f32 = 8.0;

/// Rectangular play area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
    /// Sprite edge length
    pub duck_size: f32,
    /// Edge margin
    pub margin: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self::new(DEFAULT_AREA_WIDTH, DEFAULT_AREA_HEIGHT)
    }
}

impl PlayArea {
    /// Create an area with the default sprite size and margin.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            duck_size: DUCK_SIZE,
            margin: DUCK_MARGIN,
        }
    }

    /// Smallest valid sprite position.
    pub fn min_position(&self) -> Vec2 {
        Vec2::new(self.margin, self.margin)
    }

    /// Largest valid sprite position.
    ///
    /// Collapses onto [`min_position`](Self::min_position) when the area is
    /// too small to hold a sprite plus margins.
    pub fn max_position(&self) -> Vec2 {
        let span_x = (self.width - self.duck_size - self.margin * 2.0).max(0.0);
        let span_y = (self.height - self.duck_size - self.margin * 2.0).max(0.0);
        Vec2::new(self.margin + span_x, self.margin + span_y)
    }

    /// Check whether a sprite at `position` is fully visible.
    pub fn contains(&self, position: Vec2) -> bool {
        position.within(self.min_position(), self.max_position())
    }

    /// Pick a uniformly random sprite position.
    pub fn random_position(&self, rng: &mut DeterministicRng) -> Vec2 {
        rng.random_point(self.min_position(), self.max_position())
    }

    /// Check whether `point` hits the sprite drawn at `position`.
    pub fn hits(&self, position: Vec2, point: Vec2) -> bool {
        let corner = position + Vec2::new(self.duck_size, self.duck_size);
        point.within(position, corner)
    }
}
