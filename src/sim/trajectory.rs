//! Ballistic trajectory prediction
//!
//! One integrator drives both the aiming preview and the live water drop, so the
//! preview line is an exact forecast whenever the tick dt matches the preview dt.

use glam::Vec2;

use crate::is_finite_vec2;

/// Advance one forward-Euler step: velocity first, then position
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2, gravity_y: f32, dt: f32) -> (Vec2, Vec2) {
    let vel = Vec2::new(vel.x, vel.y + gravity_y * dt);
    (pos + vel * dt, vel)
}

/// Lazily generated polyline of future positions
///
/// Yields the origin first, then one point per integration step. Stops after the
/// first point below `ground_y` or after `max_steps` steps, whichever is first.
/// Consumed once; build a new one with [`simulate`] to replay.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pos: Vec2,
    vel: Vec2,
    gravity_y: f32,
    step_dt: f32,
    ground_y: f32,
    steps_left: u32,
    started: bool,
    done: bool,
}

impl Iterator for Trajectory {
    type Item = Vec2;

    fn next(&mut self) -> Option<Vec2> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            // Nothing moves without velocity or a usable step
            if self.vel == Vec2::ZERO
                || self.steps_left == 0
                || !is_finite_vec2(self.pos)
                || !is_finite_vec2(self.vel)
                || !self.step_dt.is_finite()
                || self.step_dt <= 0.0
                || !self.gravity_y.is_finite()
            {
                self.done = true;
            }
            return Some(self.pos);
        }

        if self.steps_left == 0 {
            self.done = true;
            return None;
        }

        let (pos, vel) = integrate(self.pos, self.vel, self.gravity_y, self.step_dt);
        self.pos = pos;
        self.vel = vel;
        self.steps_left -= 1;

        if pos.y < self.ground_y {
            self.done = true;
        }
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            let pending_origin = usize::from(!self.started);
            (pending_origin, Some(self.steps_left as usize + pending_origin))
        }
    }
}

impl std::iter::FusedIterator for Trajectory {}

/// Build the trajectory of a body launched from `origin`
pub fn simulate(
    origin: Vec2,
    initial_velocity: Vec2,
    gravity_y: f32,
    step_dt: f32,
    max_steps: u32,
    ground_y: f32,
) -> Trajectory {
    Trajectory {
        pos: origin,
        vel: initial_velocity,
        gravity_y,
        step_dt,
        ground_y,
        steps_left: max_steps,
        started: false,
        done: false,
    }
}

/// Clamp a raw drag offset to the slingshot's usable range
///
/// Length is capped at `max_len`, then the offset is restricted to the
/// lower-left quadrant so the launch always points up and to the right.
pub fn clamp_drag(offset: Vec2, max_len: f32) -> Vec2 {
    if !is_finite_vec2(offset) {
        return Vec2::ZERO;
    }
    let mut offset = offset.clamp_length_max(max_len.max(0.0));
    offset.x = offset.x.min(0.0);
    offset.y = offset.y.min(0.0);
    offset
}

/// Launch velocity is the reversed drag scaled by power
#[inline]
pub fn launch_velocity(drag_offset: Vec2, launch_power: f32) -> Vec2 {
    -drag_offset * launch_power
}

/// Head angle in degrees for a drag, clamped to the neck's range
pub fn aim_angle_degrees(drag_offset: Vec2, min_deg: f32, max_deg: f32) -> f32 {
    let dir = -drag_offset;
    let deg = if dir == Vec2::ZERO {
        0.0
    } else {
        dir.y.atan2(dir.x).to_degrees()
    };
    deg.max(min_deg).min(max_deg)
}
