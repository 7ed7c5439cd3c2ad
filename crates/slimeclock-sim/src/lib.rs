//! Slimeclock Sim - presence-driven particle simulation
//!
//! Owns every piece of mutable animation state behind one context object:
//! - `PresenceDetector` / `PresenceSmoother` — raw-signal debounce and the
//!   seen-factor decay
//! - `Layout` + glyph sampling — per-frame targets from the displayed time
//! - `ParticleField` — the fixed population and its physics step
//! - entrance choreographies on the idle → enter edge
//!
//! The host calls [`SlimeSim::advance`] once per animation tick with an
//! explicit timestamp; no scheduling primitive is assumed.

pub mod entrance;
pub mod glyph;
pub mod layout;
pub mod particle;
pub mod phase;
pub mod presence;
pub mod rng;
pub mod time;

use log::debug;
use slimeclock_core::{Rect, Tuning, BLUR_AMOUNT};

pub use entrance::{EnterState, EntranceKind, LagStyle};
pub use glyph::{AlphaMask, GlyphRaster, TargetPoint, VectorGlyphs};
pub use layout::{Layout, LayoutMode, SeparatorStyle, TargetBounds};
pub use particle::{Group, Particle, ParticleField};
pub use phase::Phase;
pub use presence::{PresenceDetector, PresenceEdge, PresenceSmoother};
pub use rng::SlimeRng;
pub use time::{FixedTimeOfDay, SystemTimeOfDay, TimeOfDay};

use entrance::start_entrance;
use glyph::{digit_stride, sample_mask, separator_dots_mask, separator_stride};
use layout::{stretch_targets, target_bounds, TALL_DIGIT_STRETCH};

/// The simulation context — all state the animation loop mutates.
pub struct SlimeSim {
    tuning: Tuning,
    rng: SlimeRng,
    detector: PresenceDetector,
    smoother: PresenceSmoother,
    phase: Phase,
    enter: Option<EnterState>,
    layout: Layout,
    field: ParticleField,
    time_str: String,
    bounds: TargetBounds,
    lag_style: LagStyle,
    needs_rebuild: bool,
}

impl SlimeSim {
    pub fn new(view: Rect, tuning: Tuning, seed: u32) -> Self {
        let mut rng = SlimeRng::new(seed);
        let layout = Layout::compute(view);
        let mut field = ParticleField::new();
        field.scatter(view, &mut rng);

        Self {
            detector: PresenceDetector::new(tuning.detect_min_interval_ms),
            tuning,
            rng,
            smoother: PresenceSmoother::new(),
            phase: Phase::Idle,
            enter: None,
            layout,
            field,
            time_str: String::new(),
            bounds: TargetBounds::DEFAULT,
            lag_style: LagStyle::default(),
            needs_rebuild: true,
        }
    }

    /// Note a viewport change. Cheap to call repeatedly; the actual target
    /// rebuild is coalesced into the next `advance`.
    pub fn set_viewport(&mut self, view: Rect) {
        if view != self.layout.view {
            self.layout = Layout::compute(view);
            self.needs_rebuild = true;
        }
    }

    pub fn set_lag_style(&mut self, style: LagStyle) {
        self.lag_style = style;
    }

    /// Run one frame: presence conditioning, phase transitions, target
    /// rebuilds, and the physics step. `now` is in milliseconds; `reading`
    /// is the latest raw presence value (`None` when the detection call
    /// failed), read as-available — this never blocks on the detector.
    pub fn advance(
        &mut self,
        now: f64,
        reading: Option<bool>,
        raster: &mut dyn GlyphRaster,
        clock: &dyn TimeOfDay,
    ) {
        self.detector.ingest(now, reading);
        let seen = self.detector.seen(now);
        let edge = self.smoother.observe(seen);

        if edge == PresenceEdge::Rose && self.phase.is_idle() {
            self.rebuild_targets(raster, clock);
            let state = start_entrance(
                &mut self.field,
                &self.layout,
                now,
                self.lag_style,
                &mut self.rng,
            );
            debug!(
                "[sim] entrance {:?} until t={:.0}",
                state.kind, state.end
            );
            self.enter = Some(state);
            self.phase = Phase::Enter;
        }

        if self.smoother.update(now, self.phase.is_idle()) {
            // decay complete: this fires exactly once per lost episode
            self.enter = None;
            self.field.clear_entrance();
            self.phase = Phase::Idle;
            debug!("[sim] idle");
        }

        // viewport changes are coalesced to one rebuild per frame
        if self.needs_rebuild {
            self.rebuild_targets(raster, clock);
        }
        // ...and so is the displayed minute ticking over
        if seen && !self.phase.is_idle() && clock.hhmm() != self.time_str {
            self.rebuild_targets(raster, clock);
        }

        if seen && self.phase == Phase::Enter {
            if let Some(enter) = self.enter {
                if now >= enter.end {
                    self.enter = None;
                    self.phase = Phase::Show;
                    debug!("[sim] show");
                }
            }
        }

        self.field.step(
            now,
            self.smoother.seen_factor(),
            self.phase,
            self.layout.view,
            &mut self.rng,
        );
    }

    /// Re-sample glyph targets for the current layout and time string.
    pub fn rebuild_targets(&mut self, raster: &mut dyn GlyphRaster, clock: &dyn TimeOfDay) {
        let mut ts = clock.hhmm();
        if ts.len() != 4 || !ts.is_ascii() {
            ts = "0000".to_string();
        }
        let stride = digit_stride(&self.layout.view);

        let hours_mask = raster.rasterize(&ts[0..2], self.layout.hours.font_size);
        let mut tx_h = sample_mask(
            &hours_mask,
            self.layout.hours.center,
            stride,
            particle::HOUR_COUNT,
            true,
            &mut self.rng,
        );

        let minutes_mask = raster.rasterize(&ts[2..4], self.layout.minutes.font_size);
        let mut tx_m = sample_mask(
            &minutes_mask,
            self.layout.minutes.center,
            stride,
            particle::MINUTE_COUNT,
            false,
            &mut self.rng,
        );

        let sep_size = self.layout.separator.font_size;
        let tx_sep = match self.layout.separator_style {
            SeparatorStyle::Colon => {
                let mask = raster.rasterize(":", sep_size);
                sample_mask(
                    &mask,
                    self.layout.separator.center,
                    stride,
                    particle::SEPARATOR_COUNT,
                    true,
                    &mut self.rng,
                )
            }
            SeparatorStyle::TwoDots => {
                let mask = separator_dots_mask(sep_size);
                sample_mask(
                    &mask,
                    self.layout.separator.center,
                    separator_stride(sep_size),
                    particle::SEPARATOR_COUNT,
                    true,
                    &mut self.rng,
                )
            }
        };

        // portrait digits read better slightly elongated
        if self.layout.mode == LayoutMode::Tall {
            stretch_targets(&mut tx_h, self.layout.hours.center, 1.0, TALL_DIGIT_STRETCH);
            stretch_targets(&mut tx_m, self.layout.minutes.center, 1.0, TALL_DIGIT_STRETCH);
        }

        self.field.assign_targets(Group::Hours, &tx_h);
        self.field.assign_targets(Group::Minutes, &tx_m);
        self.field.assign_targets(Group::Separator, &tx_sep);

        let mut all = tx_h;
        all.extend(tx_m);
        all.extend(tx_sep);
        self.bounds = target_bounds(&all, self.layout.view.center(), BLUR_AMOUNT);

        debug!(
            "[sim] rebuilt targets for {ts} ({} points, {:?})",
            all.len(),
            self.layout.mode
        );
        self.time_str = ts;
        self.needs_rebuild = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seen(&self) -> bool {
        self.smoother.seen()
    }

    pub fn seen_factor(&self) -> f32 {
        self.smoother.seen_factor()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn enter(&self) -> Option<EnterState> {
        self.enter
    }

    pub fn bounds(&self) -> TargetBounds {
        self.bounds
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn time_str(&self) -> &str {
        &self.time_str
    }
}
