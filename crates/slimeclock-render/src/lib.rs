//! Slimeclock Render - density-field slime renderer
//!
//! Turns the particle population into a coalesced blob silhouette:
//! - additive soft-disc stamping into a low-resolution `DensityBuffer`
//! - box blur + hard threshold (the classic metaball trick)
//! - separator blink modulation by the wall-clock second
//! - tinted composite onto an abstract `RenderSurface`, clipped to a
//!   rounded rectangle
//!
//! Every pass degrades gracefully: a degenerate buffer or surface yields an
//! empty frame, never an error out of the frame loop.

pub mod blink;
pub mod composite;
pub mod density;
pub mod filter;

use log::debug;
use slimeclock_core::{Color, Rect, Tuning, Vec2, BLUR_AMOUNT, DISC_RADIUS};
use slimeclock_sim::{Group, ParticleField};

pub use blink::separator_scale;
pub use composite::{rounded_rect_contains, PixelSurface, RenderSurface};
pub use density::DensityBuffer;
pub use filter::{box_blur, threshold, THRESH_LEVEL};

use density::{BASE_STAMP_ALPHA, OUTLINE_ALPHA_SCALE, OUTLINE_RADIUS_SCALE};

/// The frame renderer — owns the accumulation buffer and compositing state.
pub struct Renderer {
    tuning: Tuning,
    buffer: DensityBuffer,
    view: Rect,
    tint: Color,
    corner_radius: f32,
}

impl Renderer {
    pub fn new(view: Rect, tuning: Tuning) -> Self {
        let buffer = DensityBuffer::for_view(view.width(), view.height(), tuning.max_density_pixels);
        Self {
            tuning,
            buffer,
            view,
            tint: Color::WHITE,
            corner_radius: 0.0,
        }
    }

    /// Resize the accumulation buffer for a new viewport.
    pub fn set_viewport(&mut self, view: Rect) {
        if view != self.view {
            self.view = view;
            self.buffer = DensityBuffer::for_view(
                view.width(),
                view.height(),
                self.tuning.max_density_pixels,
            );
            debug!(
                "[render] buffer {}x{} (scale {})",
                self.buffer.width(),
                self.buffer.height(),
                self.buffer.scale()
            );
        }
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius.max(0.0);
    }

    /// Render one frame of the field onto `surface`.
    pub fn render(
        &mut self,
        field: &ParticleField,
        seen_factor: f32,
        clock_seconds: f64,
        surface: &mut dyn RenderSurface,
    ) {
        self.buffer.clear();

        let sep_radius = DISC_RADIUS * separator_scale(clock_seconds, seen_factor);
        let passes = [
            (Group::Hours, self.tuning.render_budget_hours, DISC_RADIUS),
            (Group::Minutes, self.tuning.render_budget_minutes, DISC_RADIUS),
            (Group::Separator, self.tuning.render_budget_separator, sep_radius),
        ];
        for (group, budget, radius) in passes {
            let slice = field.group_slice(group);
            let stride = (slice.len() / budget.max(1)).max(1);
            for p in slice.iter().step_by(stride) {
                self.buffer
                    .stamp_disc(p.pos - self.view.min, radius, BASE_STAMP_ALPHA);
            }
        }

        if self.tuning.outline_pass {
            // fainter halo smooths the silhouette edge; digit groups only
            for (group, budget) in [
                (Group::Hours, self.tuning.render_budget_hours),
                (Group::Minutes, self.tuning.render_budget_minutes),
            ] {
                let slice = field.group_slice(group);
                let stride = (slice.len() / budget.max(1)).max(1);
                for p in slice.iter().step_by(stride) {
                    self.buffer.stamp_disc(
                        p.pos - self.view.min,
                        DISC_RADIUS * OUTLINE_RADIUS_SCALE,
                        BASE_STAMP_ALPHA * OUTLINE_ALPHA_SCALE,
                    );
                }
            }
        }

        box_blur(&mut self.buffer, BLUR_AMOUNT);
        threshold(&mut self.buffer, THRESH_LEVEL);

        self.composite(surface);
    }

    fn composite(&self, surface: &mut dyn RenderSurface) {
        let x0 = self.view.min.x.max(0.0) as usize;
        let y0 = self.view.min.y.max(0.0) as usize;
        let x1 = (self.view.max.x.min(surface.width() as f32)).max(0.0) as usize;
        let y1 = (self.view.max.y.min(surface.height() as f32)).max(0.0) as usize;
        let scale = self.buffer.scale();

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !rounded_rect_contains(self.view, self.corner_radius, p) {
                    continue;
                }
                let bx = ((p.x - self.view.min.x) / scale) as usize;
                let by = ((p.y - self.view.min.y) / scale) as usize;
                let v = self.buffer.value(
                    bx.min(self.buffer.width() - 1),
                    by.min(self.buffer.height() - 1),
                );
                if v > 0.0 {
                    surface.shade(x, y, self.tint, v);
                }
            }
        }
    }
}
