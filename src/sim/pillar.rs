//! Pillars: a solid body topped by a catchable platform

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::region::{Rect, TargetRegion};
use super::scroll::Scrollable;

/// Platform sitting on top of a pillar body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub width: f32,
    pub height: f32,
}

/// Vertical oscillation of the platform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bob {
    pub amplitude: f32,
    /// Radians per second
    pub speed: f32,
    pub phase: f32,
}

impl Bob {
    #[inline]
    pub fn offset(&self) -> f32 {
        self.amplitude * self.phase.sin()
    }

    pub fn advance(&mut self, dt: f32) {
        if self.amplitude != 0.0 {
            self.phase = (self.phase + self.speed * dt).rem_euclid(std::f32::consts::TAU);
        }
    }
}

/// A pillar standing on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pillar {
    pub id: u32,
    /// Horizontal centre
    pub x: f32,
    /// Ground level the body rises from
    pub base_y: f32,
    /// Body height (platform centre sits at the body top)
    pub height: f32,
    pub width: f32,
    /// Missing platform means the pillar can't be landed on
    pub platform: Option<Platform>,
    #[serde(default)]
    pub bob: Bob,
}

impl Pillar {
    pub fn new(id: u32, x: f32, base_y: f32, height: f32, width: f32) -> Self {
        Self {
            id,
            x,
            base_y,
            height,
            width,
            platform: None,
            bob: Bob::default(),
        }
    }

    pub fn with_platform(mut self, width: f32, height: f32) -> Self {
        self.platform = Some(Platform { width, height });
        self
    }

    pub fn with_bob(mut self, bob: Bob) -> Self {
        self.bob = bob;
        self
    }

    /// Centre of the platform (moves with the bob)
    pub fn platform_center(&self) -> Vec2 {
        Vec2::new(self.x, self.base_y + self.height + self.bob.offset())
    }

    /// Catchable area: only the lower half of the platform
    pub fn landing_rect(&self) -> Option<Rect> {
        self.platform.map(|p| {
            let c = self.platform_center();
            Rect::new(c.x - p.width / 2.0, c.y - p.height / 2.0, p.width, p.height / 2.0)
        })
    }

    /// Solid shaft from the ground to the platform centre
    pub fn body_rect(&self) -> Rect {
        Rect::new(self.x - self.width / 2.0, self.base_y, self.width, self.height)
    }

    /// Where the monkey stands after landing here
    pub fn stand_point(&self) -> Vec2 {
        let c = self.platform_center();
        match self.platform {
            Some(p) => Vec2::new(c.x, c.y + p.height / 2.0),
            None => c,
        }
    }

    /// Regions in classification order: landing first, then body
    pub fn regions(&self) -> impl Iterator<Item = TargetRegion> + '_ {
        self.landing_rect()
            .map(|r| TargetRegion::landing(self.id, r))
            .into_iter()
            .chain(std::iter::once(TargetRegion::obstacle(self.id, self.body_rect())))
    }

    pub fn update(&mut self, dt: f32) {
        self.bob.advance(dt);
    }
}

impl Scrollable for Pillar {
    fn shift_x(&mut self, dx: f32) {
        self.x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::region::RegionKind;

    #[test]
    fn test_landing_rect_is_lower_half() {
        let p = Pillar::new(1, 100.0, -300.0, 200.0, 80.0).with_platform(120.0, 40.0);
        let r = p.landing_rect().unwrap();
        assert_eq!(r, Rect::new(40.0, -120.0, 120.0, 20.0));
        assert_eq!(p.stand_point(), Vec2::new(100.0, -80.0));
    }

    #[test]
    fn test_no_platform_only_body() {
        let p = Pillar::new(2, 0.0, -300.0, 150.0, 80.0);
        let regions: Vec<_> = p.regions().collect();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].kind, RegionKind::Obstacle);
    }

    #[test]
    fn test_bob_moves_platform_within_amplitude() {
        let mut p = Pillar::new(3, 0.0, -300.0, 200.0, 80.0)
            .with_platform(120.0, 40.0)
            .with_bob(Bob {
                amplitude: 15.0,
                speed: 2.0,
                phase: 0.0,
            });
        let rest = p.platform_center().y;
        for _ in 0..200 {
            p.update(1.0 / 60.0);
            assert!((p.platform_center().y - rest).abs() <= 15.0 + 1e-3);
        }
        // Body does not bob
        assert_eq!(p.body_rect().y, -300.0);
    }
}
