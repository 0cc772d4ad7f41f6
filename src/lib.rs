//! Monkey Drop - A pillar-hopping slingshot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trajectory, landing, world scroll, game state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (preview, audio)
//! - `audio`: Injected audio service with clip cache
//! - `highscores`: Persisted leaderboard

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matches the collision check rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World gravity (pixels/s², downward)
    pub const GRAVITY_Y: f32 = -300.0;
    /// Drag offset to launch velocity multiplier
    pub const LAUNCH_POWER: f32 = 10.0;
    /// Maximum drag length from the launch anchor
    pub const MAX_DRAG: f32 = 150.0;
    /// Pointer-down must land within this distance of the anchor to start aiming
    pub const GRAB_RADIUS: f32 = 100.0;

    /// Ground level (pillar bases, preview cutoff)
    pub const GROUND_Y: f32 = -300.0;
    /// Sea level: anything at or below this is lost
    pub const HAZARD_Y: f32 = -360.0;

    /// Preview integrator step and cap
    pub const PREVIEW_DT: f32 = 0.05;
    pub const PREVIEW_STEPS: u32 = 50;
    /// Number of opening shots that get a preview line
    pub const PREVIEW_SHOT_COUNT: u32 = 3;

    /// Water drop collision radius
    pub const DROP_RADIUS: f32 = 40.0;
    /// Seconds before an airborne drop is declared lost
    pub const DROP_TTL: f32 = 5.0;
    /// Path sampling interval while airborne
    pub const PATH_SAMPLE_INTERVAL: f32 = 0.05;
    /// Despawn delays after resolution
    pub const HIT_DESPAWN_DELAY: f32 = 0.5;
    pub const MISS_DESPAWN_DELAY: f32 = 0.3;

    /// Seconds the monkey takes to walk the recorded path
    pub const TRAVEL_DURATION: f32 = 2.0;
    /// Delay between a miss and the fresh run
    pub const RESTART_DELAY: f32 = 2.0;

    /// Pillar generation
    pub const PILLAR_MIN_DISTANCE: f32 = 200.0;
    pub const PILLAR_MAX_DISTANCE: f32 = 400.0;
    pub const PILLAR_MIN_HEIGHT: f32 = 100.0;
    pub const PILLAR_MAX_HEIGHT: f32 = 300.0;
    pub const PILLAR_WIDTH: f32 = 80.0;
    /// Smallest spacing accepted between consecutive pillars
    pub const PILLAR_MIN_GAP: f32 = 1.0;
    pub const PLATFORM_WIDTH: f32 = 120.0;
    pub const PLATFORM_HEIGHT: f32 = 40.0;
    /// Gap between the anchor and the first generated pillar
    pub const FIRST_PILLAR_OFFSET: f32 = 300.0;
    /// Pillars kept ahead of the monkey
    pub const PILLAR_LOOKAHEAD: usize = 5;
    /// Pillars further than this behind the monkey are evicted
    pub const PILLAR_RETENTION: f32 = 200.0;

    /// Monkey anchor (screen-fixed spot of its feet)
    pub const ANCHOR_X: f32 = -400.0;
    pub const ANCHOR_Y: f32 = -150.0;
    /// Slingshot offset from the monkey's feet (it hangs below them)
    pub const LAUNCH_OFFSET_Y: f32 = -50.0;

    /// Points per successful landing
    pub const SCORE_PER_LANDING: u64 = 100;
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// True when both components are finite
#[inline]
pub fn is_finite_vec2(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
