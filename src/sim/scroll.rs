//! World scrolling
//!
//! After the monkey reaches a new pillar, the whole world slides left by the
//! distance walked so the monkey is back at its screen anchor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Anything with a world-space x that follows the scroll
pub trait Scrollable {
    fn shift_x(&mut self, dx: f32);
}

impl Scrollable for Vec2 {
    fn shift_x(&mut self, dx: f32) {
        self.x += dx;
    }
}

/// Distance the world must move left to bring the character back
#[inline]
pub fn compute_shift(character_start_x: f32, character_target_x: f32) -> f32 {
    character_target_x - character_start_x
}

/// Translate every entity left by `distance`
pub fn apply_shift<T: Scrollable>(distance: f32, entities: &mut [T]) {
    for entity in entities {
        entity.shift_x(-distance);
    }
}

/// Viewport anchor plus accumulated scroll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldScroll {
    /// Where the viewport starts (and returns to after each shift)
    pub anchor_initial: Vec2,
    /// Current viewport anchor (drifts while the monkey walks)
    pub anchor: Vec2,
    /// Sum of every applied shift
    pub total_shift: f32,
    /// Shifts applied so far
    pub shifts: u32,
}

impl WorldScroll {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            anchor_initial: anchor,
            anchor,
            total_shift: 0.0,
            shifts: 0,
        }
    }

    /// Record a shift and snap the viewport anchor home
    pub fn record(&mut self, distance: f32) {
        self.total_shift += distance;
        self.shifts += 1;
        self.anchor = self.anchor_initial;
    }

    /// True distance travelled by something currently at `x`
    #[inline]
    pub fn untranslated_x(&self, x: f32) -> f32 {
        x + self.total_shift
    }

    pub fn reset(&mut self) {
        self.anchor = self.anchor_initial;
        self.total_shift = 0.0;
        self.shifts = 0;
    }
}

/// A row of equal-width tiles that wraps around a visible band
///
/// Tile x values are centres. A tile whose right edge passes `left_edge` is
/// moved after the rightmost tile, and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub tiles: Vec<f32>,
    pub tile_width: f32,
    pub left_edge: f32,
    pub right_edge: f32,
    /// Fraction of the world shift this layer follows (1.0 = locked to world)
    pub factor: f32,
    /// Constant drift in pixels per second (waves)
    pub auto_scroll: f32,
}

impl ParallaxLayer {
    /// Tiles laid out from `first_x`, band of `half_view` around the origin
    ///
    /// The band extends `margin_tiles` tile widths past each side of the view.
    pub fn new(
        count: usize,
        tile_width: f32,
        first_x: f32,
        half_view: f32,
        margin_tiles: f32,
    ) -> Self {
        let tiles = (0..count).map(|i| first_x + i as f32 * tile_width).collect();
        let margin = tile_width * margin_tiles;
        Self {
            tiles,
            tile_width,
            left_edge: -half_view - margin,
            right_edge: half_view + margin,
            factor: 1.0,
            auto_scroll: 0.0,
        }
    }

    pub fn with_auto_scroll(mut self, speed: f32) -> Self {
        self.auto_scroll = speed;
        self
    }

    /// Drift by the layer's own speed
    pub fn update(&mut self, dt: f32) {
        if self.auto_scroll != 0.0 {
            self.shift_left(self.auto_scroll * dt);
        }
    }

    /// Move all tiles left, then wrap strays around
    pub fn shift_left(&mut self, distance: f32) {
        for x in &mut self.tiles {
            *x -= distance;
        }
        self.wrap();
    }

    fn wrap(&mut self) {
        if self.tiles.is_empty() || self.tile_width <= 0.0 {
            return;
        }
        let half = self.tile_width / 2.0;
        // Large shifts can push several tiles out at once
        for _ in 0..self.tiles.len() {
            self.tiles.sort_by(f32::total_cmp);
            let left = self.tiles[0];
            let right = self.tiles[self.tiles.len() - 1];

            if left + half < self.left_edge {
                self.tiles[0] = right + self.tile_width;
            } else if right - half > self.right_edge {
                let last = self.tiles.len() - 1;
                self.tiles[last] = left - self.tile_width;
            } else {
                break;
            }
        }
        self.tiles.sort_by(f32::total_cmp);
    }
}

impl Scrollable for ParallaxLayer {
    fn shift_x(&mut self, dx: f32) {
        self.shift_left(-dx * self.factor);
    }
}
