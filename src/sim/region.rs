//! Axis-aligned target regions
//!
//! Rects use a lower-left origin with y growing upward, matching world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size centred on `center`
    pub fn from_center(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Finite coordinates and non-negative extent
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Point on (or in) the rect closest to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.top()))
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }
}

/// What contact with a region means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Catchable platform: contact is a successful landing
    Landing,
    /// Horizontal kill line: the rect's top edge is the line
    Hazard,
    /// Solid body: contact is a miss
    Obstacle,
}

/// A tagged rect owned by some world object (pillar id, or 0 for the sea)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRegion {
    pub owner: u32,
    pub kind: RegionKind,
    pub rect: Rect,
}

impl TargetRegion {
    pub fn landing(owner: u32, rect: Rect) -> Self {
        Self {
            owner,
            kind: RegionKind::Landing,
            rect,
        }
    }

    pub fn obstacle(owner: u32, rect: Rect) -> Self {
        Self {
            owner,
            kind: RegionKind::Obstacle,
            rect,
        }
    }

    /// Infinitely wide hazard line at height `y`
    pub fn hazard_line(owner: u32, y: f32) -> Self {
        Self {
            owner,
            kind: RegionKind::Hazard,
            rect: Rect::new(f32::MIN / 2.0, y, f32::MAX, 0.0),
        }
    }

    /// Height of the hazard line (top edge)
    #[inline]
    pub fn line_y(&self) -> f32 {
        self.rect.top()
    }
}
