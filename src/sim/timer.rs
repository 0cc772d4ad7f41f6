//! Cancelable timers keyed to simulated time
//!
//! Replaces engine-side schedule/unschedule. Timers fire only from `advance`,
//! so everything stays on the single simulation thread.

use serde::{Deserialize, Serialize};

/// Handle returned when scheduling; used to cancel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Upper bound on how many times one interval timer may fire per `advance`
pub const MAX_FIRES_PER_ADVANCE: u32 = 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<E> {
    id: TimerId,
    /// Absolute time of next firing
    due: f64,
    /// Repeat period (None = one-shot)
    interval: Option<f64>,
    event: E,
}

/// A set of pending timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<E> {
    now: f64,
    next_id: u32,
    timers: Vec<Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            timers: Vec::new(),
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the scheduler was created
    pub fn now(&self) -> f64 {
        self.now
    }

    fn alloc_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Fire `event` once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f32, event: E) -> TimerId {
        let id = self.alloc_id();
        self.timers.push(Timer {
            id,
            due: self.now + f64::from(delay.max(0.0)),
            interval: None,
            event,
        });
        id
    }

    /// Fire `event` every `interval` seconds until canceled
    ///
    /// Non-positive intervals are clamped to a tiny period so a timer can never
    /// fire unboundedly inside one `advance`.
    pub fn schedule_interval(&mut self, interval: f32, event: E) -> TimerId {
        let id = self.alloc_id();
        let period = f64::from(interval).max(1e-4);
        self.timers.push(Timer {
            id,
            due: self.now + period,
            interval: Some(period),
            event,
        });
        id
    }

    /// Cancel a timer; true only the first time for a live timer
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        before != self.timers.len()
    }

    /// Cancel every timer whose event matches; returns how many were removed
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !pred(&t.event));
        before - self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Move time forward and collect the events that came due
    ///
    /// Events are returned in deadline order, ties broken by timer id.
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
        let now = self.now;

        let mut fired: Vec<(f64, TimerId, E)> = Vec::new();
        for timer in &mut self.timers {
            let mut fires = 0;
            while timer.due <= now && fires < MAX_FIRES_PER_ADVANCE {
                fired.push((timer.due, timer.id, timer.event.clone()));
                fires += 1;
                match timer.interval {
                    Some(period) => timer.due += period,
                    None => break,
                }
            }
            // Skip backlog beyond the cap
            if let Some(period) = timer.interval {
                if timer.due <= now {
                    let behind = ((now - timer.due) / period).floor() + 1.0;
                    timer.due += behind * period;
                }
            }
        }
        self.timers
            .retain(|t| t.interval.is_some() || t.due > now);

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, e)| e).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        A,
        B,
        Tick,
    }

    #[test]
    fn test_once_fires_once() {
        let mut s = Scheduler::new();
        s.schedule_once(0.5, Ev::A);
        assert!(s.advance(0.4).is_empty());
        assert_eq!(s.advance(0.2), vec![Ev::A]);
        assert!(s.advance(1.0).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_interval_repeats_until_canceled() {
        let mut s = Scheduler::new();
        let id = s.schedule_interval(0.25, Ev::Tick);
        assert_eq!(s.advance(0.5).len(), 2);
        assert_eq!(s.advance(0.25).len(), 1);
        assert!(s.cancel(id));
        assert!(s.advance(1.0).is_empty());
    }

    #[test]
    fn test_cancel_exactly_once() {
        let mut s = Scheduler::new();
        let id = s.schedule_once(1.0, Ev::A);
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(!s.is_pending(id));
    }

    #[test]
    fn test_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0.3, Ev::B);
        s.schedule_once(0.1, Ev::A);
        assert_eq!(s.advance(1.0), vec![Ev::A, Ev::B]);
    }

    #[test]
    fn test_cancel_where() {
        let mut s = Scheduler::new();
        s.schedule_once(1.0, Ev::A);
        s.schedule_interval(0.1, Ev::Tick);
        s.schedule_once(2.0, Ev::B);
        assert_eq!(s.cancel_where(|e| *e != Ev::B), 2);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_interval_backlog_bounded() {
        let mut s = Scheduler::new();
        s.schedule_interval(0.001, Ev::Tick);
        let fired = s.advance(10.0);
        assert_eq!(fired.len(), MAX_FIRES_PER_ADVANCE as usize);
        // Backlog skipped, next advance behaves normally
        assert!(s.advance(0.0005).len() <= 1);
    }
}
