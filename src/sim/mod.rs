//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, then entity ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod pillar;
pub mod region;
pub mod scroll;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;
pub mod trajectory;

pub use autoplay::{Autoplayer, ShotPlan, plan_shot, predict};
pub use collision::{Landing, circle_below_line, circle_rect_overlap, classify};
pub use pillar::{Bob, Pillar, Platform};
pub use region::{Rect, RegionKind, TargetRegion};
pub use scroll::{ParallaxLayer, Scrollable, WorldScroll, apply_shift, compute_shift};
pub use spawn::{evict_behind, fill_lookahead, make_pillar};
pub use state::{
    GameEvent, GamePhase, GameState, MissCause, Monkey, Projectile, SEA_OWNER, SimStats,
    TimerEvent, Travel,
};
pub use tick::{TickInput, tick, update_aim};
pub use timer::{Scheduler, TimerId};
pub use trajectory::{Trajectory, aim_angle_degrees, clamp_drag, integrate, launch_velocity, simulate};
