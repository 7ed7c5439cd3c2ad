//! Presence signal conditioning: raw-reading debounce and the seen-factor
//! smoother that eases the simulation back to idle on presence loss.

use slimeclock_core::ease::ease_out_quad;

/// A reading older than this no longer counts as "seen"
pub const SEEN_DEBOUNCE_MS: f64 = 450.0;
/// Consecutive failed detections before presence is considered lost
pub const LOST_CONFIRM_STREAK: u32 = 2;
/// Duration of the seen-factor decay after presence is lost
pub const LOST_TO_IDLE_MS: f64 = 220.0;

/// Debounces raw presence readings.
///
/// The detection collaborator reports at its own cadence; readings are
/// accepted at most once per `min_interval_ms`. A failed detection call
/// (`None`) bumps the miss streak instead of propagating — a single bad
/// frame must never stall the loop.
#[derive(Debug)]
pub struct PresenceDetector {
    min_interval_ms: f64,
    last_accept_at: f64,
    last_seen_at: f64,
    miss_streak: u32,
}

impl PresenceDetector {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_accept_at: f64::NEG_INFINITY,
            last_seen_at: f64::NEG_INFINITY,
            miss_streak: 0,
        }
    }

    /// Feed the latest raw reading. `Some(true)`: a viewer was detected.
    /// `Some(false)`: detection ran and saw nobody. `None`: the detection
    /// call itself failed.
    pub fn ingest(&mut self, now: f64, reading: Option<bool>) {
        if now - self.last_accept_at < self.min_interval_ms {
            return;
        }
        self.last_accept_at = now;

        match reading {
            Some(true) => {
                self.miss_streak = 0;
                self.last_seen_at = now;
            }
            Some(false) => {
                // a clean "nobody there" relies on the debounce window;
                // only failures count toward the confirm streak
            }
            None => {
                self.miss_streak += 1;
            }
        }
    }

    /// Debounced presence: a recent-enough sighting and no confirmed
    /// failure streak.
    pub fn seen(&self, now: f64) -> bool {
        now - self.last_seen_at <= SEEN_DEBOUNCE_MS && self.miss_streak < LOST_CONFIRM_STREAK
    }

    pub fn miss_streak(&self) -> u32 {
        self.miss_streak
    }
}

/// Edge of the debounced presence signal between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    None,
    Rose,
    Fell,
}

/// Smooths the boolean presence into `seen_factor` in [0, 1].
///
/// While seen, the factor is 1 immediately (the entrance choreography gates
/// the visible reaction instead). On loss, a 220 ms eased decay lets the
/// pull force fade before the phase snaps to idle.
#[derive(Debug)]
pub struct PresenceSmoother {
    seen: bool,
    prev_seen: bool,
    seen_factor: f32,
    decay_start: Option<f64>,
}

impl Default for PresenceSmoother {
    fn default() -> Self {
        // starts as "seen" so a viewer already present at boot does not fire
        // a spurious entrance on frame one
        Self {
            seen: true,
            prev_seen: true,
            seen_factor: 1.0,
            decay_start: None,
        }
    }
}

impl PresenceSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's debounced presence and report the edge.
    pub fn observe(&mut self, seen: bool) -> PresenceEdge {
        self.seen = seen;
        let edge = match (self.prev_seen, seen) {
            (false, true) => PresenceEdge::Rose,
            (true, false) => PresenceEdge::Fell,
            _ => PresenceEdge::None,
        };
        self.prev_seen = seen;
        edge
    }

    /// Advance the smoother. Returns true exactly once per lost-presence
    /// episode, at the instant the decay completes — the caller must then
    /// force the phase to idle and clear entrance state.
    pub fn update(&mut self, now: f64, phase_is_idle: bool) -> bool {
        if self.seen {
            self.decay_start = None;
            self.seen_factor = 1.0;
            return false;
        }
        if phase_is_idle {
            self.decay_start = None;
            self.seen_factor = 0.0;
            return false;
        }

        let start = *self.decay_start.get_or_insert(now);
        let u = ((now - start) / LOST_TO_IDLE_MS).clamp(0.0, 1.0);
        self.seen_factor = 1.0 - ease_out_quad(u as f32);
        if u >= 1.0 {
            self.decay_start = None;
            self.seen_factor = 0.0;
            return true;
        }
        false
    }

    pub fn seen(&self) -> bool {
        self.seen
    }

    pub fn seen_factor(&self) -> f32 {
        self.seen_factor
    }
}
