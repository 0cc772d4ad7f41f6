//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a run can be
//! retuned from a JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics ===
    pub gravity_y: f32,
    pub launch_power: f32,
    pub max_drag: f32,
    pub grab_radius: f32,
    pub ground_y: f32,
    pub hazard_y: f32,

    // === Preview ===
    pub preview_dt: f32,
    pub preview_steps: u32,
    pub preview_shot_count: u32,

    // === Water drop ===
    pub drop_radius: f32,
    pub drop_ttl: f32,
    pub path_sample_interval: f32,
    pub hit_despawn_delay: f32,
    pub miss_despawn_delay: f32,

    // === Travel / run ===
    pub travel_duration: f32,
    pub restart_delay: f32,
    pub score_per_landing: u64,

    // === Pillars ===
    pub pillar_min_distance: f32,
    pub pillar_max_distance: f32,
    pub pillar_min_height: f32,
    pub pillar_max_height: f32,
    pub pillar_width: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    pub first_pillar_offset: f32,
    pub pillar_lookahead: usize,
    pub pillar_retention: f32,
    /// Platform bob amplitude (0 = static pillars)
    pub bob_amplitude: f32,
    /// Platform bob angular speed (radians/s)
    pub bob_speed: f32,

    // === Layout ===
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub launch_offset_y: f32,
    pub view_half_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y,
            launch_power: LAUNCH_POWER,
            max_drag: MAX_DRAG,
            grab_radius: GRAB_RADIUS,
            ground_y: GROUND_Y,
            hazard_y: HAZARD_Y,

            preview_dt: PREVIEW_DT,
            preview_steps: PREVIEW_STEPS,
            preview_shot_count: PREVIEW_SHOT_COUNT,

            drop_radius: DROP_RADIUS,
            drop_ttl: DROP_TTL,
            path_sample_interval: PATH_SAMPLE_INTERVAL,
            hit_despawn_delay: HIT_DESPAWN_DELAY,
            miss_despawn_delay: MISS_DESPAWN_DELAY,

            travel_duration: TRAVEL_DURATION,
            restart_delay: RESTART_DELAY,
            score_per_landing: SCORE_PER_LANDING,

            pillar_min_distance: PILLAR_MIN_DISTANCE,
            pillar_max_distance: PILLAR_MAX_DISTANCE,
            pillar_min_height: PILLAR_MIN_HEIGHT,
            pillar_max_height: PILLAR_MAX_HEIGHT,
            pillar_width: PILLAR_WIDTH,
            platform_width: PLATFORM_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            first_pillar_offset: FIRST_PILLAR_OFFSET,
            pillar_lookahead: PILLAR_LOOKAHEAD,
            pillar_retention: PILLAR_RETENTION,
            bob_amplitude: 0.0,
            bob_speed: 1.5,

            anchor_x: ANCHOR_X,
            anchor_y: ANCHOR_Y,
            launch_offset_y: LAUNCH_OFFSET_Y,
            view_half_width: 640.0,
        }
    }
}

impl Tuning {
    /// Repair values that would break the simulation (swapped ranges, zero steps)
    pub fn sanitized(mut self) -> Self {
        if !self.pillar_min_distance.is_finite() || !self.pillar_max_distance.is_finite() {
            log::warn!("Pillar spacing not finite, using defaults");
            self.pillar_min_distance = PILLAR_MIN_DISTANCE;
            self.pillar_max_distance = PILLAR_MAX_DISTANCE;
        }
        if self.pillar_min_distance > self.pillar_max_distance {
            std::mem::swap(&mut self.pillar_min_distance, &mut self.pillar_max_distance);
        }
        if self.pillar_min_height > self.pillar_max_height {
            std::mem::swap(&mut self.pillar_min_height, &mut self.pillar_max_height);
        }
        if !self.preview_dt.is_finite() || self.preview_dt <= 0.0 {
            log::warn!("preview_dt {} invalid, using default", self.preview_dt);
            self.preview_dt = PREVIEW_DT;
        }
        if !self.path_sample_interval.is_finite() || self.path_sample_interval <= 0.0 {
            self.path_sample_interval = PATH_SAMPLE_INTERVAL;
        }
        // Every new pillar must land strictly ahead of the last one
        if self.pillar_min_distance < PILLAR_MIN_GAP {
            log::warn!("pillar_min_distance {} too small, using {}", self.pillar_min_distance, PILLAR_MIN_GAP);
            self.pillar_min_distance = PILLAR_MIN_GAP;
        }
        self.pillar_max_distance = self.pillar_max_distance.max(self.pillar_min_distance);
        if !self.first_pillar_offset.is_finite() || self.first_pillar_offset < 0.0 {
            self.first_pillar_offset = 0.0;
        }
        self.pillar_lookahead = self.pillar_lookahead.max(1);
        self.drop_radius = self.drop_radius.max(0.0);
        self.travel_duration = self.travel_duration.max(0.0);
        self
    }

    /// Parse tuning from JSON
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    pub fn try_load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity_y": -500.0, "pillar_lookahead": 3 }"#).unwrap();
        assert_eq!(tuning.gravity_y, -500.0);
        assert_eq!(tuning.pillar_lookahead, 3);
        assert_eq!(tuning.launch_power, LAUNCH_POWER);
    }

    #[test]
    fn test_sanitize_swaps_ranges() {
        let tuning = Tuning {
            pillar_min_distance: 500.0,
            pillar_max_distance: 100.0,
            preview_dt: 0.0,
            pillar_lookahead: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.pillar_min_distance, 100.0);
        assert_eq!(tuning.pillar_max_distance, 500.0);
        assert_eq!(tuning.preview_dt, PREVIEW_DT);
        assert_eq!(tuning.pillar_lookahead, 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Tuning::try_load(Path::new("/nonexistent/monkey-drop-tuning.json")).is_err());
    }

    #[test]
    fn test_sanitize_forces_forward_spacing() {
        let tuning = Tuning::from_json(
            r#"{ "pillar_min_distance": 0.0, "pillar_max_distance": 0.0, "first_pillar_offset": -50.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.pillar_min_distance, PILLAR_MIN_GAP);
        assert!(tuning.pillar_max_distance >= tuning.pillar_min_distance);
        assert_eq!(tuning.first_pillar_offset, 0.0);

        let tuning = Tuning::from_json(r#"{ "pillar_min_distance": -300.0, "pillar_max_distance": -100.0 }"#).unwrap();
        assert_eq!(tuning.pillar_min_distance, PILLAR_MIN_GAP);
        assert_eq!(tuning.pillar_max_distance, PILLAR_MIN_GAP);
    }
}
