//! Fixed particle population and the per-frame physics step

use crate::glyph::TargetPoint;
use crate::phase::Phase;
use crate::rng::SlimeRng;
use slimeclock_core::ease::{ease_out_circ, ease_out_expo, overshoot_blend};
use slimeclock_core::{Rect, Vec2, DISC_RADIUS};

pub const HOUR_COUNT: usize = 770;
pub const MINUTE_COUNT: usize = 770;
pub const SEPARATOR_COUNT: usize = 110;
pub const POPULATION: usize = HOUR_COUNT + MINUTE_COUNT + SEPARATOR_COUNT;

pub const IDLE_JITTER: f32 = 0.35;
pub const SEEK_STRENGTH: f32 = 0.085;
/// Damping while fully seen; idle damping is nearly free-drifting
pub const ACTIVE_DAMPING: f32 = 0.78;
pub const IDLE_DAMPING: f32 = 0.98;
/// Inelastic wall bounce: the offending velocity component reverses and shrinks
pub const WALL_RESTITUTION: f32 = 0.5;

/// Ambient wobble while on display (pixels)
pub const SHOW_WOBBLE_AMP: f32 = 8.32;
const WOBBLE_BASE_HZ: f32 = 0.10;
const WOBBLE_JITTER_HZ: f32 = 16.24;

// overshoot profile of the primary entrance
const OVERSHOOT_AMOUNT: f32 = 1.0;
const OVERSHOOT_PEAK_FRAC: f32 = 0.4;
const OVERSHOOT_TIME_POWER: f32 = 1.0;
const OVERSHOOT_OUT_STEEPNESS: f32 = 40.0;
const OVERSHOOT_IN_STEEPNESS: f32 = 40.0;

/// Inward padding of the wall-collision rectangle
pub fn wall_pad() -> f32 {
    (DISC_RADIUS * 0.9).max(2.0)
}

/// Particle group; sub-counts are fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Hours,
    Minutes,
    Separator,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Hours, Group::Minutes, Group::Separator];

    pub fn count(self) -> usize {
        match self {
            Group::Hours => HOUR_COUNT,
            Group::Minutes => MINUTE_COUNT,
            Group::Separator => SEPARATOR_COUNT,
        }
    }

    pub fn offset(self) -> usize {
        match self {
            Group::Hours => 0,
            Group::Minutes => HOUR_COUNT,
            Group::Separator => HOUR_COUNT + MINUTE_COUNT,
        }
    }

    pub fn range(self) -> std::ops::Range<usize> {
        self.offset()..self.offset() + self.count()
    }
}

/// Easing applied over a catch-up window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchEase {
    /// Spring past the target, then settle (primary entrance)
    Overshoot,
    /// Smooth converge (lagged particles joining in)
    OutCirc,
    OutExpo,
}

impl CatchEase {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            CatchEase::Overshoot => overshoot_blend(
                t,
                OVERSHOOT_AMOUNT,
                OVERSHOOT_PEAK_FRAC,
                OVERSHOOT_TIME_POWER,
                OVERSHOOT_OUT_STEEPNESS,
                OVERSHOOT_IN_STEEPNESS,
            ),
            CatchEase::OutCirc => ease_out_circ(t),
            CatchEase::OutExpo => ease_out_expo(t, 10.0, 1.0),
        }
    }
}

/// One point mass. Allocated once at startup; only motion fields mutate.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    pub group: Group,
    /// When this particle may start converging
    pub active_at: f64,
    pub catch_start: f64,
    pub catch_until: f64,
    pub catch_ease: Option<CatchEase>,
    /// Position the catch-up interpolation starts from
    pub catch_from: Vec2,
    /// Waiting out a delayed entrance; disarms when `active_at` passes
    pub lag_armed: bool,
    pub lag_jitter_mul: f32,
}

impl Particle {
    fn new(group: Group) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            target: Vec2::ZERO,
            group,
            active_at: 0.0,
            catch_start: 0.0,
            catch_until: 0.0,
            catch_ease: None,
            catch_from: Vec2::ZERO,
            lag_armed: false,
            lag_jitter_mul: 1.0,
        }
    }
}

/// Shader-style deterministic hash of a particle index, in [0, 1) — keeps
/// per-particle wobble frequencies out of lockstep.
pub fn wobble_hash(index: usize) -> f32 {
    let h = ((index as f32) * 12.9898 + 78.233).sin() * 43758.5453;
    h - h.floor()
}

/// The fixed-size particle population
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        let mut particles = Vec::with_capacity(POPULATION);
        for group in Group::ALL {
            for _ in 0..group.count() {
                particles.push(Particle::new(group));
            }
        }
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn group_slice(&self, group: Group) -> &[Particle] {
        &self.particles[group.range()]
    }

    /// Randomize all positions inside the padded view and zero all motion —
    /// startup state.
    pub fn scatter(&mut self, view: Rect, rng: &mut SlimeRng) {
        let area = view.inset(wall_pad());
        for p in &mut self.particles {
            p.pos = Vec2::new(
                rng.range(area.min.x, area.max.x.max(area.min.x + 1.0)),
                rng.range(area.min.y, area.max.y.max(area.min.y + 1.0)),
            );
            p.vel = Vec2::ZERO;
            p.target = p.pos;
        }
        self.clear_entrance();
    }

    /// Point every particle of `group` at a target; indices wrap modulo the
    /// sample count when the group outnumbers the targets.
    pub fn assign_targets(&mut self, group: Group, targets: &[TargetPoint]) {
        if targets.is_empty() {
            return;
        }
        for (k, i) in group.range().enumerate() {
            self.particles[i].target = targets[k % targets.len()].pos;
        }
    }

    /// Reset all entrance bookkeeping (activation, catch-up, lag)
    pub fn clear_entrance(&mut self) {
        for p in &mut self.particles {
            p.active_at = 0.0;
            p.catch_start = 0.0;
            p.catch_until = 0.0;
            p.catch_ease = None;
            p.catch_from = p.pos;
            p.lag_armed = false;
            p.lag_jitter_mul = 1.0;
        }
    }

    /// One physics step over the whole population. `now` is in milliseconds
    /// on the same clock as the entrance windows.
    pub fn step(&mut self, now: f64, seen_factor: f32, phase: Phase, view: Rect, rng: &mut SlimeRng) {
        let sf = seen_factor.clamp(0.0, 1.0);
        let uf = 1.0 - sf;
        let walls = view.inset(wall_pad());

        for (i, p) in self.particles.iter_mut().enumerate() {
            if sf > 1e-4 {
                if now < p.active_at {
                    // waiting out a delayed entrance: jitter only, elevated
                    // for the lag-armed so they visibly loiter
                    let jm = if p.lag_armed { p.lag_jitter_mul } else { 1.0 };
                    let jmul = jm * sf + uf;
                    p.vel.x = (p.vel.x + rng.centered() * IDLE_JITTER * jmul) * IDLE_DAMPING;
                    p.vel.y = (p.vel.y + rng.centered() * IDLE_JITTER * jmul) * IDLE_DAMPING;
                } else {
                    if p.lag_armed {
                        // the laggard drifted while waiting — catch up from
                        // where it actually is, not from its old snapshot
                        p.lag_armed = false;
                        p.lag_jitter_mul = 1.0;
                        p.catch_from = p.pos;
                        p.catch_start = now;
                        p.catch_until = now + (p.catch_until - p.active_at).max(0.0);
                        p.catch_ease = Some(CatchEase::OutCirc);
                    }

                    let mut target = p.target;
                    if p.catch_start > 0.0 && now < p.catch_until {
                        let dur = (p.catch_until - p.catch_start).max(1.0);
                        let tn = ((now - p.catch_start) / dur).clamp(0.0, 1.0) as f32;
                        let prog = p.catch_ease.map_or(tn, |e| e.apply(tn));
                        target = p.catch_from + (p.target - p.catch_from) * prog;
                    }

                    let wobble_amp = if phase == Phase::Show {
                        SHOW_WOBBLE_AMP * sf
                    } else {
                        0.0
                    };
                    let j = (wobble_hash(i) - 0.5) * 2.0;
                    let fx = WOBBLE_BASE_HZ + j * WOBBLE_JITTER_HZ * 0.15;
                    let fy = WOBBLE_BASE_HZ * 1.3 + j * WOBBLE_JITTER_HZ * 0.11;
                    let t = (now * 0.001) as f32;
                    let wobble = Vec2::new(
                        (t * fx + i as f32 * 0.37).sin() * wobble_amp,
                        (t * fy + i as f32 * 0.41).cos() * wobble_amp,
                    );

                    let d = target + wobble - p.pos;
                    let damp = IDLE_DAMPING + (ACTIVE_DAMPING - IDLE_DAMPING) * sf;
                    let jx = rng.centered() * IDLE_JITTER * uf;
                    let jy = rng.centered() * IDLE_JITTER * uf;
                    p.vel.x = (p.vel.x + d.x * SEEK_STRENGTH * sf + jx) * damp;
                    p.vel.y = (p.vel.y + d.y * SEEK_STRENGTH * sf + jy) * damp;
                }
            } else {
                p.vel.x = (p.vel.x + rng.centered() * IDLE_JITTER) * IDLE_DAMPING;
                p.vel.y = (p.vel.y + rng.centered() * IDLE_JITTER) * IDLE_DAMPING;
            }

            p.pos += p.vel;

            if p.pos.x < walls.min.x {
                p.pos.x = walls.min.x;
                p.vel.x *= -WALL_RESTITUTION;
            } else if p.pos.x > walls.max.x {
                p.pos.x = walls.max.x;
                p.vel.x *= -WALL_RESTITUTION;
            }
            if p.pos.y < walls.min.y {
                p.pos.y = walls.min.y;
                p.vel.y *= -WALL_RESTITUTION;
            } else if p.pos.y > walls.max.y {
                p.pos.y = walls.max.y;
                p.vel.y *= -WALL_RESTITUTION;
            }
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    fn make_points(n: usize) -> Vec<TargetPoint> {
        (0..n)
            .map(|i| TargetPoint {
                pos: Vec2::new(i as f32 * 10.0, i as f32),
                guide: false,
            })
            .collect()
    }

    #[test]
    fn population_counts_are_fixed() {
        let field = ParticleField::new();
        assert_eq!(field.len(), POPULATION);
        for group in Group::ALL {
            assert_eq!(field.group_slice(group).len(), group.count());
            assert!(field.group_slice(group).iter().all(|p| p.group == group));
        }
    }

    #[test]
    fn assign_wraps_modulo() {
        let mut field = ParticleField::new();
        let points = make_points(40);
        field.assign_targets(Group::Hours, &points);

        let hours = field.group_slice(Group::Hours);
        // 770 particles over 40 points: 0, 40, 80, ... share point 0
        assert_eq!(hours[0].target, points[0].pos);
        assert_eq!(hours[40].target, points[0].pos);
        assert_eq!(hours[80].target, points[0].pos);
        assert_eq!(hours[41].target, points[1].pos);
        // other groups untouched
        assert_eq!(field.group_slice(Group::Minutes)[0].target, Vec2::ZERO);
    }

    #[test]
    fn assign_empty_is_noop() {
        let mut field = ParticleField::new();
        field.assign_targets(Group::Hours, &make_points(10));
        let before = field.group_slice(Group::Hours)[5].target;
        field.assign_targets(Group::Hours, &[]);
        assert_eq!(field.group_slice(Group::Hours)[5].target, before);
    }

    #[test]
    fn population_survives_rebuilds() {
        let mut field = ParticleField::new();
        for n in [5, 800, 40] {
            field.assign_targets(Group::Hours, &make_points(n));
            field.assign_targets(Group::Minutes, &make_points(n));
            field.assign_targets(Group::Separator, &make_points(n));
            assert_eq!(field.len(), POPULATION);
        }
    }

    #[test]
    fn scatter_stays_inside_padded_view() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(11);
        field.scatter(VIEW, &mut rng);
        let walls = VIEW.inset(wall_pad());
        for p in field.particles() {
            assert!(walls.contains(p.pos));
            assert_eq!(p.vel, Vec2::ZERO);
        }
    }

    #[test]
    fn step_keeps_particles_in_bounds() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(3);
        field.scatter(VIEW, &mut rng);
        // fling one particle at a wall
        field.particles_mut()[0].vel = Vec2::new(-5000.0, 9000.0);

        for frame in 0..20 {
            field.step(frame as f64 * 16.0, 0.0, Phase::Idle, VIEW, &mut rng);
            let walls = VIEW.inset(wall_pad());
            for p in field.particles() {
                assert!(walls.contains(p.pos), "escaped at frame {frame}");
            }
        }
    }

    #[test]
    fn wall_collision_reverses_and_shrinks_velocity() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(3);
        field.scatter(VIEW, &mut rng);
        let p = &mut field.particles_mut()[0];
        p.pos = Vec2::new(100.0, 500.0);
        p.vel = Vec2::new(-400.0, 0.0);

        field.step(0.0, 0.0, Phase::Idle, VIEW, &mut rng);
        let p = &field.particles()[0];
        let walls = VIEW.inset(wall_pad());
        assert_eq!(p.pos.x, walls.min.x);
        assert!(p.vel.x > 0.0);
        // jitter is tiny next to the impact speed; restitution dominates
        assert!(p.vel.x < 400.0 * WALL_RESTITUTION + 1.0);
    }

    #[test]
    fn idle_step_never_seeks() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(9);
        field.scatter(VIEW, &mut rng);
        let p = &mut field.particles_mut()[0];
        p.pos = Vec2::new(200.0, 200.0);
        p.vel = Vec2::ZERO;
        p.target = Vec2::new(1800.0, 900.0);

        field.step(0.0, 0.0, Phase::Idle, VIEW, &mut rng);
        // a seek force would add ~136 px/frame; jitter stays under half a px
        assert!(field.particles()[0].vel.length() < 0.5);
    }

    #[test]
    fn seen_step_pulls_toward_target() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(9);
        field.scatter(VIEW, &mut rng);
        let p = &mut field.particles_mut()[0];
        p.pos = Vec2::new(200.0, 500.0);
        p.vel = Vec2::ZERO;
        p.target = Vec2::new(1200.0, 500.0);

        field.step(0.0, 1.0, Phase::Show, VIEW, &mut rng);
        assert!(field.particles()[0].vel.x > 10.0);
    }

    #[test]
    fn catch_up_overrides_seek_target() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(9);
        field.scatter(VIEW, &mut rng);
        let p = &mut field.particles_mut()[0];
        p.pos = Vec2::new(100.0, 500.0);
        p.vel = Vec2::ZERO;
        p.target = Vec2::new(1100.0, 500.0);
        p.catch_from = p.pos;
        p.catch_start = 1.0;
        p.catch_until = 321.0;
        p.catch_ease = Some(CatchEase::OutCirc);

        // early in the window the eased target is still near the start, so
        // the pull is far weaker than a direct seek would be
        field.step(2.0, 1.0, Phase::Enter, VIEW, &mut rng);
        let direct_pull = 1000.0 * SEEK_STRENGTH * ACTIVE_DAMPING;
        assert!(field.particles()[0].vel.x.abs() < direct_pull * 0.5);
    }

    #[test]
    fn lag_disarm_restarts_window_from_current_position() {
        let mut field = ParticleField::new();
        let mut rng = SlimeRng::new(9);
        field.scatter(VIEW, &mut rng);
        let drifted = Vec2::new(333.0, 444.0);
        let p = &mut field.particles_mut()[0];
        p.pos = drifted;
        p.lag_armed = true;
        p.lag_jitter_mul = 2.2;
        p.active_at = 1000.0;
        p.catch_start = 1000.0;
        p.catch_until = 1320.0;
        p.catch_ease = Some(CatchEase::OutCirc);

        field.step(1001.0, 1.0, Phase::Enter, VIEW, &mut rng);
        let p = &field.particles()[0];
        assert!(!p.lag_armed);
        assert_eq!(p.lag_jitter_mul, 1.0);
        assert_eq!(p.catch_from, drifted);
        assert_eq!(p.catch_start, 1001.0);
        assert!((p.catch_until - 1321.0).abs() < 1e-6);
    }

    #[test]
    fn catch_ease_endpoints() {
        for ease in [CatchEase::Overshoot, CatchEase::OutCirc, CatchEase::OutExpo] {
            assert!(ease.apply(0.0).abs() < 1e-6);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn wobble_hash_varies_per_index() {
        let a = wobble_hash(0);
        let b = wobble_hash(1);
        assert!((0.0..1.0).contains(&a));
        assert!((0.0..1.0).contains(&b));
        assert!((a - b).abs() > 1e-3);
    }
}
