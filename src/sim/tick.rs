//! Fixed timestep simulation tick
//!
//! Drives one launch cycle: aim, launch, fly, land, walk, shift the world.

use glam::Vec2;

use super::collision::{Landing, classify};
use super::region::RegionKind;
use super::scroll::{Scrollable, apply_shift, compute_shift};
use super::spawn::evict_behind;
use super::state::{
    GameEvent, GamePhase, GameState, Monkey, MissCause, Projectile, SEA_OWNER, TimerEvent, Travel,
};
use super::trajectory::{aim_angle_degrees, clamp_drag, integrate, launch_velocity, simulate};

/// Pointer input for a single tick, already in world space
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Touch/click started here
    pub pointer_down: Option<Vec2>,
    /// Pointer is currently here (while held)
    pub pointer_move: Option<Vec2>,
    /// Touch/click released (or canceled)
    pub pointer_up: bool,
    /// Throw away the run and start over
    pub reset: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.reset {
        log::info!("Run reset requested");
        state.reset_run();
        return;
    }

    state.time_ticks += 1;

    // Ambient motion
    for pillar in &mut state.pillars {
        pillar.update(dt);
    }
    state.waves.update(dt);
    ride_pillar(state);

    // Scheduled callbacks
    for event in state.timers.advance(dt) {
        handle_timer(state, event);
    }

    // A release this tick arms the drop; it launches on the next one
    let phase = state.phase;
    handle_pointer(state, input);

    match phase {
        GamePhase::Armed => launch_drop(state),
        GamePhase::Airborne => step_drop(state, dt),
        GamePhase::Traveling => step_travel(state, dt),
        GamePhase::WorldShift => shift_world(state),
        GamePhase::Idle | GamePhase::Aiming | GamePhase::GameOver => {}
    }
}

/// Keep the standing monkey on a bobbing platform
fn ride_pillar(state: &mut GameState) {
    if matches!(
        state.phase,
        GamePhase::Traveling | GamePhase::WorldShift | GamePhase::GameOver
    ) {
        return;
    }
    if let Some(stand) = state
        .monkey
        .standing_on
        .and_then(|id| state.pillar(id))
        .map(|p| p.stand_point())
    {
        state.monkey.pos.y = stand.y;
    }
}

/// Aim handling: grab, drag, release
fn handle_pointer(state: &mut GameState, input: &TickInput) {
    if state.phase.is_busy() {
        return;
    }

    if let Some(down) = input.pointer_down {
        if state.phase == GamePhase::Idle
            && down.distance(state.launch_point()) < state.tuning.grab_radius
        {
            state.phase = GamePhase::Aiming;
            state.drag = Vec2::ZERO;
            log::debug!("Aiming started at ({:.0}, {:.0})", down.x, down.y);
        }
    }

    if state.phase != GamePhase::Aiming {
        return;
    }

    if let Some(pos) = input.pointer_move {
        update_aim(state, pos);
    }

    if input.pointer_up {
        state.preview.clear();
        state.monkey.head_angle = Monkey::DEFAULT_HEAD_ANGLE;
        if state.drag == Vec2::ZERO {
            state.phase = GamePhase::Idle;
            return;
        }
        let velocity = launch_velocity(state.drag, state.tuning.launch_power);
        state.armed_velocity = Some(velocity);
        state.phase = GamePhase::Armed;
        log::debug!("Armed with velocity ({:.0}, {:.0})", velocity.x, velocity.y);
    }
}

/// Recompute drag offset, head angle and preview for a pointer position
pub fn update_aim(state: &mut GameState, pointer: Vec2) {
    let origin = state.launch_point();
    state.drag = clamp_drag(pointer - origin, state.tuning.max_drag);
    state.monkey.head_angle =
        aim_angle_degrees(state.drag, Monkey::MIN_HEAD_ANGLE, Monkey::MAX_HEAD_ANGLE);

    state.preview.clear();
    if state.preview_enabled() && state.drag != Vec2::ZERO {
        let t = &state.tuning;
        state.preview.extend(simulate(
            origin,
            launch_velocity(state.drag, t.launch_power),
            t.gravity_y,
            t.preview_dt,
            t.preview_steps,
            t.ground_y,
        ));
    }
}

/// Armed -> Airborne
fn launch_drop(state: &mut GameState) {
    let Some(velocity) = state.armed_velocity.take() else {
        state.phase = GamePhase::Idle;
        return;
    };
    // One live drop at a time
    if state.projectile.as_ref().is_some_and(|d| d.is_flying()) {
        log::warn!("Launch ignored: a drop is still in flight");
        return;
    }

    let id = state.next_entity_id();
    let origin = state.launch_point();
    let t = &state.tuning;
    let mut drop = Projectile::new(id, origin, velocity, t.drop_radius, t.drop_ttl);

    let sample_every = t.path_sample_interval;
    let ttl = t.drop_ttl;
    drop.timers
        .push(state.timers.schedule_interval(sample_every, TimerEvent::SamplePath { drop_id: id }));
    drop.timers
        .push(state.timers.schedule_once(ttl, TimerEvent::DropTimeout { drop_id: id }));

    state.projectile = Some(drop);
    state.path_points.clear();
    state.path_points.push(origin);
    state.shots += 1;
    state.phase = GamePhase::Airborne;
    state.events.push(GameEvent::Launched {
        drop_id: id,
        velocity,
    });
    log::info!(
        "Shot {} launched: v=({:.0}, {:.0})",
        state.shots,
        velocity.x,
        velocity.y
    );
}

/// Integrate the drop and classify its position
fn step_drop(state: &mut GameState, dt: f32) {
    let regions = state.target_regions();
    let gravity_y = state.tuning.gravity_y;

    let Some(drop) = state.projectile.as_mut() else {
        state.phase = GamePhase::Idle;
        return;
    };
    if !drop.is_flying() {
        return;
    }

    let (pos, vel) = integrate(drop.pos, drop.vel, gravity_y, dt);
    drop.pos = pos;
    drop.vel = vel;
    drop.ttl -= dt;
    let (radius, drop_id) = (drop.radius, drop.id);

    state.stats.classify_calls += 1;
    match classify(pos, radius, &regions) {
        Landing::None => {}
        Landing::Hit { region } => resolve_hit(state, drop_id, region.owner),
        Landing::Miss { region } => {
            let cause = if region.kind == RegionKind::Hazard || region.owner == SEA_OWNER {
                MissCause::Hazard
            } else {
                MissCause::Obstacle {
                    pillar_id: region.owner,
                }
            };
            resolve_miss(state, drop_id, cause);
        }
    }
}

/// Mark the drop resolved and cancel its flight timers, exactly once
fn finish_flight(state: &mut GameState, drop_id: u32) -> Option<Vec2> {
    let drop = state.projectile.as_mut().filter(|d| d.id == drop_id)?;
    if !drop.begin_resolve() {
        return None;
    }
    let pos = drop.pos;
    let timers = std::mem::take(&mut drop.timers);

    let mut canceled = 0;
    for id in timers {
        if state.timers.cancel(id) {
            canceled += 1;
        }
    }
    // Anything scheduled for this drop outside its handle list
    canceled += state
        .timers
        .cancel_where(|e| e.is_flight_timer_of(drop_id));
    state.stats.canceled_timers += canceled as u64;
    state.stats.resolutions += 1;
    Some(pos)
}

fn resolve_hit(state: &mut GameState, drop_id: u32, pillar_id: u32) {
    let Some(pos) = finish_flight(state, drop_id) else {
        return;
    };

    state.path_points.push(pos);
    state.score += state.tuning.score_per_landing;
    state.landings += 1;
    state.events.push(GameEvent::Landed {
        drop_id,
        pillar_id,
        pos,
    });
    log::info!(
        "Drop {} landed on pillar {} at ({:.0}, {:.0}), score {}",
        drop_id,
        pillar_id,
        pos.x,
        pos.y,
        state.score
    );

    let despawn = state.tuning.hit_despawn_delay;
    state.timers.schedule_once(despawn, TimerEvent::Despawn { drop_id });

    let target = state
        .pillar(pillar_id)
        .map(|p| p.stand_point())
        .unwrap_or(pos);
    let mut path = Vec::with_capacity(state.path_points.len() + 1);
    path.push(state.monkey.pos);
    path.extend(state.path_points.iter().skip(1).copied());
    path.push(target);

    state.travel = Some(Travel {
        path,
        elapsed: 0.0,
        duration: state.tuning.travel_duration,
        target,
        target_pillar: pillar_id,
        start_x: state.monkey.pos.x,
    });
    state.monkey.walking = true;
    state.phase = GamePhase::Traveling;
}

fn resolve_miss(state: &mut GameState, drop_id: u32, cause: MissCause) {
    let Some(pos) = finish_flight(state, drop_id) else {
        return;
    };

    state.events.push(GameEvent::Missed {
        drop_id,
        cause,
        pos,
    });
    let despawn = state.tuning.miss_despawn_delay;
    state.timers.schedule_once(despawn, TimerEvent::Despawn { drop_id });

    let distance = state.distance();
    state.events.push(GameEvent::GameOver {
        score: state.score,
        landings: state.landings,
        distance,
    });
    log::info!(
        "Game over ({:?}): score {}, {} landings, distance {:.0}",
        cause,
        state.score,
        state.landings,
        distance
    );

    state.phase = GamePhase::GameOver;
    let delay = state.tuning.restart_delay;
    if delay > 0.0 {
        state.timers.schedule_once(delay, TimerEvent::Restart);
    } else {
        state.reset_run();
    }
}

fn handle_timer(state: &mut GameState, event: TimerEvent) {
    match event {
        TimerEvent::SamplePath { drop_id } => {
            if let Some(drop) = state
                .projectile
                .as_ref()
                .filter(|d| d.id == drop_id && d.is_flying())
            {
                state.path_points.push(drop.pos);
            }
        }
        TimerEvent::DropTimeout { drop_id } => {
            let flying = state
                .projectile
                .as_ref()
                .is_some_and(|d| d.id == drop_id && d.is_flying());
            if flying {
                log::debug!("Drop {} timed out", drop_id);
                resolve_miss(state, drop_id, MissCause::Timeout);
            }
        }
        TimerEvent::Despawn { drop_id } => {
            if state.projectile.as_ref().is_some_and(|d| d.id == drop_id) {
                state.projectile = None;
            }
        }
        TimerEvent::Restart => {
            if state.phase == GamePhase::GameOver {
                state.reset_run();
            }
        }
    }
}

/// Walk the monkey along the recorded path
fn step_travel(state: &mut GameState, dt: f32) {
    let Some(travel) = state.travel.as_mut() else {
        state.phase = GamePhase::WorldShift;
        return;
    };

    travel.elapsed += dt;
    state.monkey.pos = travel.position();
    // Camera follows the walk
    state.scroll.anchor.x = state.scroll.anchor_initial.x + (state.monkey.pos.x - travel.start_x);
    if !travel.is_done() {
        return;
    }

    let (pillar_id, fallback) = (travel.target_pillar, travel.target);
    let landed_on = state.pillar(pillar_id);
    let target = landed_on.map(|p| p.stand_point()).unwrap_or(fallback);
    let arrived_on = landed_on.map(|p| p.id);

    state.monkey.pos = target;
    state.monkey.standing_on = arrived_on;
    state.monkey.walking = false;
    state.travel = None;
    state.events.push(GameEvent::Arrived {
        pillar_id: arrived_on,
    });
    state.phase = GamePhase::WorldShift;
}

/// Slide everything left so the monkey is home again, then recycle pillars
fn shift_world(state: &mut GameState) {
    let distance = compute_shift(state.monkey.home.x, state.monkey.pos.x);

    // Snap exactly home
    state.monkey.pos.x = state.monkey.home.x;
    apply_shift(distance, &mut state.pillars);
    apply_shift(distance, &mut state.path_points);
    state.background.shift_x(-distance);
    state.waves.shift_x(-distance);
    state.scroll.record(distance);
    state.events.push(GameEvent::WorldShifted { distance });
    log::debug!(
        "World shifted by {:.0} (total {:.0})",
        distance,
        state.scroll.total_shift
    );

    let character_x = state.monkey.pos.x;
    let retention = state.tuning.pillar_retention;
    for pillar_id in evict_behind(&mut state.pillars, character_x, retention) {
        state.events.push(GameEvent::PillarEvicted { pillar_id });
    }

    for pillar_id in state.refill_pillars() {
        state.events.push(GameEvent::PillarSpawned { pillar_id });
    }

    state.phase = GamePhase::Idle;
}
