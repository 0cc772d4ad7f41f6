//! Pillar generation and eviction
//!
//! Pillars are laid out left to right with seeded random spacing and height.
//! The same seed always produces the same course.

use rand::Rng;
use rand_pcg::Pcg32;

use super::pillar::{Bob, Pillar};
use crate::tuning::Tuning;

/// Uniform sample that tolerates an empty range
fn sample(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Build one pillar at `x`
pub fn make_pillar(id: u32, x: f32, rng: &mut Pcg32, tuning: &Tuning) -> Pillar {
    let height = sample(rng, tuning.pillar_min_height, tuning.pillar_max_height);
    let mut pillar = Pillar::new(id, x, tuning.ground_y, height, tuning.pillar_width)
        .with_platform(tuning.platform_width, tuning.platform_height);

    if tuning.bob_amplitude != 0.0 {
        let phase = sample(rng, 0.0, std::f32::consts::TAU);
        pillar = pillar.with_bob(Bob {
            amplitude: tuning.bob_amplitude,
            speed: tuning.bob_speed,
            phase,
        });
    }
    pillar
}

/// Extra attempts allowed beyond the lookahead before a fill gives up
const MAX_EXTRA_SPAWNS: usize = 16;

/// Append pillars until `lookahead` of them stand right of `character_x`
///
/// Each new pillar goes a random gap past the rightmost one (or past
/// `character_x + first_offset` when none are ahead). Spacing that fails to
/// move forward stops the fill after `lookahead + 16` pillars. Returns how
/// many were added.
pub fn fill_lookahead(
    pillars: &mut Vec<Pillar>,
    character_x: f32,
    first_offset: f32,
    rng: &mut Pcg32,
    tuning: &Tuning,
    mut next_id: impl FnMut() -> u32,
) -> usize {
    let mut added = 0;
    let max_added = tuning.pillar_lookahead.saturating_add(MAX_EXTRA_SPAWNS);
    loop {
        let ahead = pillars.iter().filter(|p| p.x > character_x).count();
        if ahead >= tuning.pillar_lookahead {
            break;
        }
        if added >= max_added {
            log::warn!("Pillar fill gave up after {} spawns with {} ahead", added, ahead);
            break;
        }

        let last_x = pillars
            .iter()
            .map(|p| p.x)
            .fold(None, |acc: Option<f32>, x| Some(acc.map_or(x, |a| a.max(x))));
        let start_x = match last_x {
            Some(x) if x > character_x => x,
            _ => character_x + first_offset,
        };
        let gap = sample(rng, tuning.pillar_min_distance, tuning.pillar_max_distance);
        let id = next_id();
        let pillar = make_pillar(id, start_x + gap, rng, tuning);
        log::debug!("Spawned pillar {} at x={:.0} height={:.0}", id, pillar.x, pillar.height);
        pillars.push(pillar);
        added += 1;
    }
    added
}

/// Remove pillars more than `retention` behind the character
///
/// Returns the evicted ids in their original order.
pub fn evict_behind(pillars: &mut Vec<Pillar>, character_x: f32, retention: f32) -> Vec<u32> {
    let cutoff = character_x - retention;
    let evicted: Vec<u32> = pillars
        .iter()
        .filter(|p| p.x < cutoff)
        .map(|p| p.id)
        .collect();
    pillars.retain(|p| p.x >= cutoff);
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ids() -> impl FnMut() -> u32 {
        let mut next = 0;
        move || {
            next += 1;
            next
        }
    }

    #[test]
    fn test_initial_fill_respects_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut pillars = Vec::new();
        let added = fill_lookahead(&mut pillars, -400.0, 300.0, &mut rng, &tuning, ids());

        assert_eq!(added, tuning.pillar_lookahead);
        let mut last = -400.0 + 300.0;
        for p in &pillars {
            let gap = p.x - last;
            assert!(gap >= tuning.pillar_min_distance - 1e-3 && gap <= tuning.pillar_max_distance + 1e-3);
            assert!(p.height >= tuning.pillar_min_height && p.height <= tuning.pillar_max_height);
            assert!(p.platform.is_some());
            last = p.x;
        }
    }

    #[test]
    fn test_same_seed_same_course() {
        let tuning = Tuning::default();
        let mut a = Vec::new();
        let mut b = Vec::new();
        fill_lookahead(&mut a, 0.0, 300.0, &mut Pcg32::seed_from_u64(7), &tuning, ids());
        fill_lookahead(&mut b, 0.0, 300.0, &mut Pcg32::seed_from_u64(7), &tuning, ids());
        let xa: Vec<f32> = a.iter().map(|p| p.x).collect();
        let xb: Vec<f32> = b.iter().map(|p| p.x).collect();
        assert_eq!(xa, xb);
    }

    #[test]
    fn test_zero_spacing_fill_terminates() {
        // Unsanitized spacing that never moves forward
        let tuning = Tuning {
            pillar_min_distance: 0.0,
            pillar_max_distance: 0.0,
            first_pillar_offset: 0.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pillars = Vec::new();
        let added = fill_lookahead(&mut pillars, 0.0, 0.0, &mut rng, &tuning, ids());
        assert_eq!(added, tuning.pillar_lookahead + MAX_EXTRA_SPAWNS);
        assert_eq!(pillars.len(), added);

        // Sanitized, the same input fills normally
        let tuning = tuning.sanitized();
        let mut pillars = Vec::new();
        let added = fill_lookahead(&mut pillars, 0.0, tuning.first_pillar_offset, &mut rng, &tuning, ids());
        assert_eq!(added, tuning.pillar_lookahead);
        assert!(pillars.iter().all(|p| p.x > 0.0));
    }

    #[test]
    fn test_evict_and_refill() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pillars = vec![
            Pillar::new(1, -700.0, -300.0, 100.0, 80.0),
            Pillar::new(2, -400.0, -300.0, 100.0, 80.0),
            Pillar::new(3, -100.0, -300.0, 100.0, 80.0),
        ];
        let evicted = evict_behind(&mut pillars, -400.0, 200.0);
        assert_eq!(evicted, vec![1]);
        assert_eq!(pillars.len(), 2);

        let mut next = 10;
        fill_lookahead(&mut pillars, -400.0, 300.0, &mut rng, &tuning, || {
            next += 1;
            next
        });
        let ahead = pillars.iter().filter(|p| p.x > -400.0).count();
        assert_eq!(ahead, tuning.pillar_lookahead);
        // New pillars continue past the last existing one
        assert!(pillars[2].x > -100.0);
    }
}
