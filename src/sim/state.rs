//! Game state and core simulation types
//!
//! Everything a run needs to continue deterministically lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pillar::Pillar;
use super::region::TargetRegion;
use super::scroll::{ParallaxLayer, WorldScroll};
use super::spawn::fill_lookahead;
use super::timer::{Scheduler, TimerId};
use crate::tuning::Tuning;

/// Owner id used for the sea's hazard line
pub const SEA_OWNER: u32 = 0;

/// Where a launch cycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to grab the slingshot
    Idle,
    /// Dragging; preview line may be shown
    Aiming,
    /// Drag released, launch happens next tick
    Armed,
    /// Drop in flight, classified every tick
    Airborne,
    /// Monkey walking the recorded path to the new pillar
    Traveling,
    /// Monkey arrived; world slides back to the anchor
    WorldShift,
    /// Run lost, waiting for the restart timer
    GameOver,
}

impl GamePhase {
    /// Phases in which pointer input is ignored
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            GamePhase::Armed
                | GamePhase::Airborne
                | GamePhase::Traveling
                | GamePhase::WorldShift
                | GamePhase::GameOver
        )
    }
}

/// Why a drop was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissCause {
    /// Fell into the sea
    Hazard,
    /// Struck a pillar body
    Obstacle { pillar_id: u32 },
    /// Flew too long without resolving
    Timeout,
}

/// Things that happened during a tick (for audio, UI, logging)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { seed: u64 },
    Launched { drop_id: u32, velocity: Vec2 },
    Landed { drop_id: u32, pillar_id: u32, pos: Vec2 },
    Missed { drop_id: u32, cause: MissCause, pos: Vec2 },
    Arrived { pillar_id: Option<u32> },
    WorldShifted { distance: f32 },
    PillarSpawned { pillar_id: u32 },
    PillarEvicted { pillar_id: u32 },
    GameOver { score: u64, landings: u32, distance: f32 },
}

/// Scheduled callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Record the drop's position into the path
    SamplePath { drop_id: u32 },
    /// Drop has been airborne too long
    DropTimeout { drop_id: u32 },
    /// Remove the resolved drop from the world
    Despawn { drop_id: u32 },
    /// Start a fresh run after a miss
    Restart,
}

impl TimerEvent {
    /// Timers that must die with the drop's flight
    pub fn is_flight_timer_of(&self, id: u32) -> bool {
        matches!(
            *self,
            TimerEvent::SamplePath { drop_id } | TimerEvent::DropTimeout { drop_id } if drop_id == id
        )
    }
}

/// The launched water drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Still part of the world (false once despawned)
    pub alive: bool,
    /// Seconds of flight left before a forced miss
    pub ttl: f32,
    /// Set once the drop has resolved; guards against double resolution
    pub destroying: bool,
    /// Flight timers, canceled on resolution
    #[serde(default)]
    pub timers: Vec<TimerId>,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, ttl: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            alive: true,
            ttl,
            destroying: false,
            timers: Vec::new(),
        }
    }

    /// Claim the right to resolve; false if already resolved
    pub fn begin_resolve(&mut self) -> bool {
        if self.destroying {
            return false;
        }
        self.destroying = true;
        true
    }

    /// Airborne and not yet resolved
    pub fn is_flying(&self) -> bool {
        self.alive && !self.destroying
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monkey {
    /// Feet position
    pub pos: Vec2,
    /// Screen-fixed standing spot the world shift restores
    pub home: Vec2,
    /// Pillar currently stood on
    pub standing_on: Option<u32>,
    /// Head rotation in degrees (follows the aim)
    pub head_angle: f32,
    pub walking: bool,
}

impl Monkey {
    pub const DEFAULT_HEAD_ANGLE: f32 = 45.0;
    pub const MIN_HEAD_ANGLE: f32 = -45.0;
    pub const MAX_HEAD_ANGLE: f32 = 80.0;

    pub fn new(home: Vec2) -> Self {
        Self {
            pos: home,
            home,
            standing_on: None,
            head_angle: Self::DEFAULT_HEAD_ANGLE,
            walking: false,
        }
    }
}

/// Walk along the recorded path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Travel {
    pub path: Vec<Vec2>,
    pub elapsed: f32,
    pub duration: f32,
    pub target: Vec2,
    pub target_pillar: u32,
    pub start_x: f32,
}

impl Travel {
    /// Position after `elapsed` seconds, equal time per segment
    pub fn position(&self) -> Vec2 {
        let n = self.path.len();
        if n == 0 {
            return self.target;
        }
        if n == 1 || self.duration <= 0.0 {
            return if self.is_done() { self.target } else { self.path[0] };
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let seg = t * (n - 1) as f32;
        let i = (seg.floor() as usize).min(n - 2);
        crate::lerp_vec2(self.path[i], self.path[i + 1], seg - i as f32)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Bookkeeping used to verify resolution guards
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimStats {
    /// Classifier invocations
    pub classify_calls: u64,
    /// Drops resolved (hit or miss)
    pub resolutions: u64,
    /// Flight timers canceled on resolution
    pub canceled_timers: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,

    pub monkey: Monkey,
    /// Current clamped drag offset (Aiming)
    pub drag: Vec2,
    /// Velocity fixed on release (Armed)
    pub armed_velocity: Option<Vec2>,
    pub projectile: Option<Projectile>,
    /// Pillars, left to right in spawn order
    pub pillars: Vec<Pillar>,
    /// Preview polyline while aiming
    pub preview: Vec<Vec2>,
    /// Sampled flight path of the last drop
    pub path_points: Vec<Vec2>,
    pub travel: Option<Travel>,

    pub scroll: WorldScroll,
    pub background: ParallaxLayer,
    pub waves: ParallaxLayer,
    pub timers: Scheduler<TimerEvent>,

    pub score: u64,
    pub landings: u32,
    pub shots: u32,
    /// Events produced by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub stats: SimStats,
    /// Next entity ID
    next_id: u32,
}

/// Six 1280 wide tiles centred on the view
fn background_layer(tuning: &Tuning) -> ParallaxLayer {
    ParallaxLayer::new(6, 1280.0, -1280.0, tuning.view_half_width, 2.0)
}

/// 256 wide wave tiles spanning the view, drifting left
fn wave_layer(tuning: &Tuning) -> ParallaxLayer {
    let half_view = tuning.view_half_width;
    ParallaxLayer::new(
        (2.0 * half_view / 256.0).ceil() as usize + 2,
        256.0,
        -half_view + 128.0,
        half_view,
        1.0,
    )
    .with_auto_scroll(30.0)
}

impl GameState {
    /// New run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let home = Vec2::new(tuning.anchor_x, tuning.anchor_y);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            time_ticks: 0,
            monkey: Monkey::new(home),
            drag: Vec2::ZERO,
            armed_velocity: None,
            projectile: None,
            pillars: Vec::new(),
            preview: Vec::new(),
            path_points: Vec::new(),
            travel: None,
            scroll: WorldScroll::new(Vec2::ZERO),
            background: background_layer(&tuning),
            waves: wave_layer(&tuning),
            timers: Scheduler::new(),
            score: 0,
            landings: 0,
            shots: 0,
            events: Vec::new(),
            stats: SimStats::default(),
            next_id: 1,
            tuning,
        };

        state.spawn_initial_pillars();
        state.events.push(GameEvent::RunStarted { seed });
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Where the drop leaves from
    pub fn launch_point(&self) -> Vec2 {
        self.monkey.pos + Vec2::new(0.0, self.tuning.launch_offset_y)
    }

    /// True distance walked this run
    pub fn distance(&self) -> f32 {
        self.scroll.untranslated_x(self.monkey.pos.x) - self.monkey.home.x
    }

    /// Whether the next shot gets a preview line
    pub fn preview_enabled(&self) -> bool {
        self.shots < self.tuning.preview_shot_count
    }

    pub fn pillar(&self, id: u32) -> Option<&Pillar> {
        self.pillars.iter().find(|p| p.id == id)
    }

    /// Regions the drop is tested against: sea first, then every pillar except
    /// the one the monkey launched from
    pub fn target_regions(&self) -> Vec<TargetRegion> {
        let mut regions = Vec::with_capacity(self.pillars.len() * 2 + 1);
        regions.push(TargetRegion::hazard_line(SEA_OWNER, self.tuning.hazard_y));
        for pillar in &self.pillars {
            if Some(pillar.id) == self.monkey.standing_on {
                continue;
            }
            regions.extend(pillar.regions());
        }
        regions
    }

    /// Top the course up to the lookahead ahead of the monkey
    ///
    /// Returns the ids of the pillars added.
    pub fn refill_pillars(&mut self) -> Vec<u32> {
        let mut pillars = std::mem::take(&mut self.pillars);
        let first_new = pillars.len();
        let mut next_id = self.next_id;
        fill_lookahead(
            &mut pillars,
            self.monkey.pos.x,
            self.tuning.first_pillar_offset,
            &mut self.rng,
            &self.tuning,
            || {
                let id = next_id;
                next_id += 1;
                id
            },
        );
        self.next_id = next_id;
        let added = pillars[first_new..].iter().map(|p| p.id).collect();
        self.pillars = pillars;
        added
    }

    /// Generate the opening course
    fn spawn_initial_pillars(&mut self) {
        let added = self.refill_pillars();
        log::info!("Spawned {} pillars (seed {})", added.len(), self.seed);
    }

    /// Throw away the current run and start over on a new course
    ///
    /// A live drop is destroyed first: its timers are canceled and it can no
    /// longer resolve.
    pub fn reset_run(&mut self) {
        if let Some(drop) = self.projectile.as_mut() {
            drop.destroying = true;
            drop.alive = false;
        }
        self.projectile = None;
        self.timers.clear();

        self.phase = GamePhase::Idle;
        self.monkey = Monkey::new(self.monkey.home);
        self.drag = Vec2::ZERO;
        self.armed_velocity = None;
        self.preview.clear();
        self.path_points.clear();
        self.travel = None;
        self.scroll.reset();
        self.background = background_layer(&self.tuning);
        self.waves = wave_layer(&self.tuning);
        self.score = 0;
        self.landings = 0;
        self.shots = 0;
        self.pillars.clear();
        self.spawn_initial_pillars();
        self.events.push(GameEvent::RunStarted { seed: self.seed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::region::RegionKind;

    #[test]
    fn test_new_state_has_lookahead() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.pillars.len(), state.tuning.pillar_lookahead);
        assert!(state.pillars.iter().all(|p| p.x > state.monkey.pos.x));
        assert!(state.projectile.is_none());
    }

    #[test]
    fn test_slingshot_hangs_below_feet() {
        let state = GameState::new(3);
        assert_eq!(state.monkey.pos, Vec2::new(-400.0, -150.0));
        assert_eq!(state.launch_point(), Vec2::new(-400.0, -200.0));
    }

    #[test]
    fn test_regions_sea_first_and_skip_home() {
        let mut state = GameState::new(1);
        let first = state.pillars[0].id;
        state.monkey.standing_on = Some(first);
        let regions = state.target_regions();
        assert_eq!(regions[0].kind, RegionKind::Hazard);
        assert!(regions.iter().all(|r| r.owner != first));
    }

    #[test]
    fn test_travel_equal_time_segments() {
        let travel = Travel {
            path: vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            elapsed: 0.5,
            duration: 2.0,
            target: Vec2::new(10.0, 10.0),
            target_pillar: 1,
            start_x: 0.0,
        };
        // Quarter of the way: halfway through the first segment
        assert_eq!(travel.position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_projectile_resolves_once() {
        let mut drop = Projectile::new(1, Vec2::ZERO, Vec2::ONE, 40.0, 5.0);
        assert!(drop.begin_resolve());
        assert!(!drop.begin_resolve());
        assert!(!drop.is_flying());
    }

    #[test]
    fn test_reset_run_restores_opening() {
        let mut state = GameState::new(5);
        state.score = 500;
        state.monkey.pos.x += 120.0;
        state.projectile = Some(Projectile::new(99, Vec2::ZERO, Vec2::ONE, 40.0, 5.0));
        state.timers.schedule_once(1.0, TimerEvent::DropTimeout { drop_id: 99 });
        state.background.shift_left(3000.0);
        state.waves.update(1.3);
        state.reset_run();
        assert_eq!(state.score, 0);
        assert!(state.projectile.is_none());
        assert!(state.timers.is_empty());
        assert_eq!(state.monkey.pos, state.monkey.home);
        assert_eq!(state.phase, GamePhase::Idle);
        // Parallax back at the opening layout
        let fresh = GameState::new(5);
        assert_eq!(state.background.tiles, fresh.background.tiles);
        assert_eq!(state.waves.tiles, fresh.waves.tiles);
    }

    #[test]
    fn test_zero_spacing_tuning_still_builds_course() {
        let tuning = Tuning::from_json(
            r#"{ "pillar_min_distance": 0.0, "pillar_max_distance": 0.0, "first_pillar_offset": 0.0 }"#,
        )
        .unwrap();
        let state = GameState::with_tuning(8, tuning);
        assert_eq!(state.pillars.len(), state.tuning.pillar_lookahead);
        assert!(state.pillars.iter().all(|p| p.x > state.monkey.pos.x));
    }
}
