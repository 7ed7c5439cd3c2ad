//! Entrance choreographies fired on the idle → enter transition

use crate::layout::Layout;
use crate::particle::{CatchEase, Group, ParticleField};
use crate::rng::SlimeRng;
use slimeclock_core::Vec2;

/// Catch-up window length for both choreographies
pub const CATCHUP_MS: f64 = 320.0;
/// How long the lagged cluster loiters before joining
pub const LAG_DELAY_MS: f64 = 1200.0;
/// Elevated jitter while loitering, so the laggards read as alive
pub const LAG_JITTER_MUL: f32 = 2.2;
/// Fraction of the quadrant's candidates that lags
pub const LAG_RATIO: f32 = 1.0;
/// A quadrant with fewer candidates falls back to the whole group
pub const QUADRANT_MIN_CANDIDATES: usize = 6;
const LAG_IMPULSE_MIN: f32 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceKind {
    /// Every particle converges at once with the overshoot ease
    Converge,
    /// Converge, but one spatial cluster of one digit group hangs back
    DelayedCluster,
}

/// How the lagging subset is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LagStyle {
    /// Grown around a far-out seed by target proximity (reads as one blob)
    #[default]
    Clustered,
    /// Spread out by a relaxing min-distance sieve
    Dispersed,
}

/// An entrance episode in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnterState {
    pub kind: EntranceKind,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [
        Quadrant::UpperRight,
        Quadrant::UpperLeft,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    fn contains(self, anchor: Vec2, p: Vec2) -> bool {
        let right = p.x >= anchor.x;
        let up = p.y <= anchor.y;
        match self {
            Quadrant::UpperRight => right && up,
            Quadrant::UpperLeft => !right && up,
            Quadrant::LowerLeft => !right && !up,
            Quadrant::LowerRight => right && !up,
        }
    }
}

/// Seed an entrance: arm every particle for the synchronized overshoot, then
/// (for the delayed-cluster variant) push one cluster's activation out.
/// The separator group never lags — a delay there is visually illegible.
pub fn start_entrance(
    field: &mut ParticleField,
    layout: &Layout,
    now: f64,
    lag_style: LagStyle,
    rng: &mut SlimeRng,
) -> EnterState {
    field.clear_entrance();
    for p in field.particles_mut() {
        p.catch_from = p.pos;
        p.active_at = now;
        p.catch_start = now;
        p.catch_until = now + CATCHUP_MS;
        p.catch_ease = Some(CatchEase::Overshoot);
    }

    let kind = if rng.pick(2) == 0 {
        EntranceKind::Converge
    } else {
        EntranceKind::DelayedCluster
    };

    let mut end = now + CATCHUP_MS;
    if kind == EntranceKind::DelayedCluster {
        let group = if rng.pick(2) == 0 {
            Group::Hours
        } else {
            Group::Minutes
        };
        let anchor = match group {
            Group::Hours => layout.hours.center,
            _ => layout.minutes.center,
        };
        let quad = Quadrant::ALL[rng.pick(4)];

        // candidates by *target* position, so the cluster reads on the digits
        let mut pool: Vec<(usize, Vec2)> = group
            .range()
            .map(|i| (i, field.particles()[i].target))
            .filter(|&(_, t)| quad.contains(anchor, t))
            .collect();
        if pool.len() < QUADRANT_MIN_CANDIDATES {
            pool = group
                .range()
                .map(|i| (i, field.particles()[i].target))
                .collect();
        }

        let want = ((pool.len() as f32 * LAG_RATIO).round() as usize).max(3);
        let lag_n = want.clamp(1, pool.len());
        let picked = match lag_style {
            LagStyle::Clustered => pick_clustered(&pool, lag_n, anchor, rng),
            LagStyle::Dispersed => pick_dispersed(&pool, lag_n, rng),
        };

        for &i in &picked {
            let p = &mut field.particles_mut()[i];
            p.active_at = now + LAG_DELAY_MS;
            p.lag_armed = true;
            p.lag_jitter_mul = LAG_JITTER_MUL;

            // shove the laggard outward so it visibly falls behind instead
            // of merely waiting in place
            let n = (p.target - anchor).normalized();
            let sp = rng.range(LAG_IMPULSE_MIN, LAG_IMPULSE_MIN * 2.0);
            p.vel.x += n.x * sp + rng.centered() * sp * 0.25;
            p.vel.y += n.y * sp + rng.centered() * sp * 0.25;

            p.catch_start = p.active_at;
            p.catch_until = p.catch_start + CATCHUP_MS;
            p.catch_ease = Some(CatchEase::OutCirc);
        }

        end = now + LAG_DELAY_MS + CATCHUP_MS;
    }

    EnterState {
        kind,
        start: now,
        end,
    }
}

/// Pick `n` candidates clustered around a seed drawn from the top quarter
/// farthest from the anchor.
fn pick_clustered(pool: &[(usize, Vec2)], n: usize, anchor: Vec2, rng: &mut SlimeRng) -> Vec<usize> {
    if pool.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(usize, Vec2, f32)> = pool
        .iter()
        .map(|&(i, t)| (i, t, t.distance_squared(anchor)))
        .collect();
    scored.sort_by(|a, b| b.2.total_cmp(&a.2));

    let top = ((scored.len() as f32 * 0.25).round() as usize).max(1);
    let seed = scored[rng.pick(top)].1;

    let mut by_seed: Vec<(usize, f32)> = pool
        .iter()
        .map(|&(i, t)| (i, t.distance_squared(seed)))
        .collect();
    by_seed.sort_by(|a, b| a.1.total_cmp(&b.1));
    by_seed.truncate(n);
    by_seed.into_iter().map(|(i, _)| i).collect()
}

/// Pick `n` candidates spread out over the pool: multi-pass min-distance
/// sieve with a relaxing radius, topped up randomly if it runs dry.
fn pick_dispersed(pool: &[(usize, Vec2)], n: usize, rng: &mut SlimeRng) -> Vec<usize> {
    if n >= pool.len() {
        return pool.iter().map(|&(i, _)| i).collect();
    }

    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
    for &(_, t) in pool {
        min.x = min.x.min(t.x);
        min.y = min.y.min(t.y);
        max.x = max.x.max(t.x);
        max.y = max.y.max(t.y);
    }
    let diag = (max - min).length() + 1e-6;

    let mut picked: Vec<(usize, Vec2)> = Vec::with_capacity(n);
    let mut cand: Vec<(usize, Vec2)> = pool.to_vec();
    let mut min_d = diag * 0.35;
    for _pass in 0..5 {
        if picked.len() >= n {
            break;
        }
        rng.shuffle(&mut cand);
        let min_d2 = min_d * min_d;
        for &(i, t) in &cand {
            if picked.len() >= n {
                break;
            }
            if picked.iter().any(|&(pi, _)| pi == i) {
                continue;
            }
            if picked.iter().all(|&(_, pt)| (t - pt).length_squared() >= min_d2) {
                picked.push((i, t));
            }
        }
        min_d *= 0.65;
    }

    // sieve ran dry: fill the remainder at random, no duplicates
    if picked.len() < n {
        let mut rest: Vec<(usize, Vec2)> = pool
            .iter()
            .filter(|&&(i, _)| !picked.iter().any(|&(pi, _)| pi == i))
            .copied()
            .collect();
        while picked.len() < n && !rest.is_empty() {
            let k = rng.pick(rest.len());
            picked.push(rest.swap_remove(k));
        }
    }

    picked.into_iter().map(|(i, _)| i).collect()
}
