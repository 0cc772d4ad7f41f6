//! Landing classification for the water drop
//!
//! The drop is a circle; targets are axis-aligned rects. Contact is decided by
//! manual geometry every tick rather than by physics callbacks.

use glam::Vec2;

use super::region::{Rect, RegionKind, TargetRegion};
use crate::is_finite_vec2;

/// Outcome of a classification pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Landing {
    /// No contact, keep flying
    None,
    /// Touched a landing platform
    Hit { region: TargetRegion },
    /// Crossed the hazard line or struck an obstacle
    Miss { region: TargetRegion },
}

impl Landing {
    /// Hit or Miss
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Landing::None)
    }
}

/// Circle vs axis-aligned rect overlap (touching counts)
///
/// Clamps the centre onto the rect and compares squared distance with r².
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Bottom of the circle at or below the line
#[inline]
pub fn circle_below_line(center: Vec2, radius: f32, line_y: f32) -> bool {
    center.y - radius <= line_y
}

/// Classify the drop against every region
///
/// Hazard lines are checked first and win outright. Pillars are then visited
/// in the order their owner first appears; within one pillar the landing rects
/// are tried before its obstacle rects. First match wins. Malformed regions
/// are skipped.
pub fn classify(pos: Vec2, radius: f32, regions: &[TargetRegion]) -> Landing {
    if !is_finite_vec2(pos) || !radius.is_finite() {
        return Landing::None;
    }

    for region in regions.iter().filter(|r| r.kind == RegionKind::Hazard) {
        if region.line_y().is_finite() && circle_below_line(pos, radius, region.line_y()) {
            return Landing::Miss { region: *region };
        }
    }

    let mut visited: Vec<u32> = Vec::new();
    for region in regions.iter().filter(|r| r.kind != RegionKind::Hazard) {
        if visited.contains(&region.owner) {
            continue;
        }
        visited.push(region.owner);

        if let Some(hit) = first_contact(pos, radius, regions, region.owner, RegionKind::Landing) {
            return Landing::Hit { region: hit };
        }
        if let Some(blocked) = first_contact(pos, radius, regions, region.owner, RegionKind::Obstacle) {
            return Landing::Miss { region: blocked };
        }
    }

    Landing::None
}

/// First valid region of `owner` and `kind` touching the circle
fn first_contact(
    pos: Vec2,
    radius: f32,
    regions: &[TargetRegion],
    owner: u32,
    kind: RegionKind,
) -> Option<TargetRegion> {
    regions
        .iter()
        .filter(|r| r.owner == owner && r.kind == kind && r.rect.is_valid())
        .find(|r| circle_rect_overlap(pos, radius, &r.rect))
        .copied()
}
