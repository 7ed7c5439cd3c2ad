//! Glyph rasterization boundary and target-point sampling
//!
//! The engine only ever asks for "this string, this size, as an alpha mask"
//! and walks the mask into a bounded set of target points. Font shaping is a
//! host concern behind [`GlyphRaster`]; [`VectorGlyphs`] is a built-in
//! segment-stroke backend so the crate works without any font stack.

use crate::rng::SlimeRng;
use slimeclock_core::{Rect, Vec2};

/// Mask pixels above this alpha become candidate target points
const ALPHA_CUTOFF: u8 = 128;

/// A sampled point of a rasterized glyph, assigned to particles as a seek
/// destination. Lists of these are replaced wholesale, never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetPoint {
    pub pos: Vec2,
    pub guide: bool,
}

/// Off-screen 8-bit alpha mask
#[derive(Clone, Debug)]
pub struct AlphaMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl AlphaMask {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0
        }
    }

    /// Paint a filled disc
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.fill_capsule(cx, cy, cx, cy, r);
    }

    /// Paint a thick segment with round caps from (x0,y0) to (x1,y1)
    pub fn fill_capsule(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, half_width: f32) {
        let min_x = (x0.min(x1) - half_width).floor().max(0.0) as usize;
        let max_x = ((x0.max(x1) + half_width).ceil() as usize).min(self.width.saturating_sub(1));
        let min_y = (y0.min(y1) - half_width).floor().max(0.0) as usize;
        let max_y = ((y0.max(y1) + half_width).ceil() as usize).min(self.height.saturating_sub(1));

        let (dx, dy) = (x1 - x0, y1 - y0);
        let seg_len2 = dx * dx + dy * dy;
        let hw2 = half_width * half_width;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                // squared distance from pixel center to the segment
                let t = if seg_len2 > 1e-12 {
                    (((px - x0) * dx + (py - y0) * dy) / seg_len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (qx, qy) = (x0 + dx * t, y0 + dy * t);
                let d2 = (px - qx) * (px - qx) + (py - qy) * (py - qy);
                if d2 <= hw2 {
                    self.data[y * self.width + x] = 255;
                }
            }
        }
    }
}

/// External glyph rasterization contract: render `text` at `size` pixels
/// tall into a tight alpha mask, centered in the mask.
pub trait GlyphRaster {
    fn rasterize(&mut self, text: &str, size: f32) -> AlphaMask;
}

/// Built-in seven-segment-style digit renderer (plus `:`), used when the
/// host provides no font-backed rasterizer.
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorGlyphs;

// segment bit masks: A top, B upper-right, C lower-right, D bottom,
// E lower-left, F upper-left, G middle
const SEG_A: u8 = 1 << 0;
const SEG_B: u8 = 1 << 1;
const SEG_C: u8 = 1 << 2;
const SEG_D: u8 = 1 << 3;
const SEG_E: u8 = 1 << 4;
const SEG_F: u8 = 1 << 5;
const SEG_G: u8 = 1 << 6;

fn digit_segments(ch: char) -> u8 {
    match ch {
        '0' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
        '1' => SEG_B | SEG_C,
        '2' => SEG_A | SEG_B | SEG_G | SEG_E | SEG_D,
        '3' => SEG_A | SEG_B | SEG_G | SEG_C | SEG_D,
        '4' => SEG_F | SEG_G | SEG_B | SEG_C,
        '5' => SEG_A | SEG_F | SEG_G | SEG_C | SEG_D,
        '6' => SEG_A | SEG_F | SEG_G | SEG_E | SEG_D | SEG_C,
        '7' => SEG_A | SEG_B | SEG_C,
        '8' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
        '9' => SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
        _ => 0,
    }
}

impl GlyphRaster for VectorGlyphs {
    fn rasterize(&mut self, text: &str, size: f32) -> AlphaMask {
        let stroke = (size * 0.065).max(2.0);
        let digit_w = size * 0.62;
        let gap = size * 0.18;
        let count = text.chars().count().max(1);
        let total_w = count as f32 * (digit_w + gap) - gap;

        let w = (total_w + stroke * 2.0 + 8.0).ceil() as usize;
        let h = (size * 1.04 + stroke * 2.0 + 8.0).ceil() as usize;
        let mut mask = AlphaMask::new(w, h);

        let cy = h as f32 * 0.5;
        let mut cx = w as f32 * 0.5 - total_w * 0.5 + digit_w * 0.5;
        for ch in text.chars() {
            draw_glyph(&mut mask, ch, cx, cy, size, stroke * 0.5);
            cx += digit_w + gap;
        }
        mask
    }
}

fn draw_glyph(mask: &mut AlphaMask, ch: char, cx: f32, cy: f32, size: f32, half_stroke: f32) {
    if ch == ':' {
        let hh = size * 0.52;
        mask.fill_circle(cx, cy - hh * 0.35, size * 0.10);
        mask.fill_circle(cx, cy + hh * 0.35, size * 0.10);
        return;
    }

    let segs = digit_segments(ch);
    if segs == 0 {
        return;
    }
    let hw = size * 0.31;
    let hh = size * 0.52;
    // pull segment endpoints in so corners join without overshooting
    let t = half_stroke * 1.2;

    let lines: [(u8, f32, f32, f32, f32); 7] = [
        (SEG_A, -hw + t, -hh, hw - t, -hh),
        (SEG_B, hw, -hh + t, hw, -t),
        (SEG_C, hw, t, hw, hh - t),
        (SEG_D, -hw + t, hh, hw - t, hh),
        (SEG_E, -hw, t, -hw, hh - t),
        (SEG_F, -hw, -hh + t, -hw, -t),
        (SEG_G, -hw + t, 0.0, hw - t, 0.0),
    ];
    for (bit, x0, y0, x1, y1) in lines {
        if segs & bit != 0 {
            mask.fill_capsule(cx + x0, cy + y0, cx + x1, cy + y1, half_stroke);
        }
    }
}

/// Mask generator for the tall layout's horizontal two-dot separator
pub fn separator_dots_mask(size: f32) -> AlphaMask {
    let dot_r = size * 0.14;
    let gap = size * 0.75;
    let w = (size * 2.4).ceil().max(10.0) as usize;
    let h = ((dot_r * 2.0 + 6.0).max(size * 0.5)).ceil() as usize;
    let mut mask = AlphaMask::new(w, h);
    let cy = h as f32 * 0.5;
    mask.fill_circle(w as f32 * 0.5 - gap * 0.5, cy, dot_r);
    mask.fill_circle(w as f32 * 0.5 + gap * 0.5, cy, dot_r);
    mask
}

/// Fixed sampling stride for digit masks, derived from viewport size
pub fn digit_stride(view: &Rect) -> usize {
    ((view.width().min(view.height()) * 0.0035).floor() as usize).max(1)
}

/// Finer stride for the separator — its mask is much smaller, so it needs
/// denser sampling to yield enough unique targets
pub fn separator_stride(font_size: f32) -> usize {
    ((font_size * 0.04).floor() as usize).max(1)
}

/// Walk `mask` on a fixed stride, collecting pixels above the alpha cutoff
/// as target points positioned so the mask center lands on `center`. If more
/// candidates than `budget` turn up, shuffle-and-truncate down to it.
pub fn sample_mask(
    mask: &AlphaMask,
    center: Vec2,
    stride: usize,
    budget: usize,
    guide: bool,
    rng: &mut SlimeRng,
) -> Vec<TargetPoint> {
    let stride = stride.max(1);
    let ox = center.x - mask.width() as f32 * 0.5;
    let oy = center.y - mask.height() as f32 * 0.5;

    let mut points = Vec::new();
    let mut y = 0;
    while y < mask.height() {
        let mut x = 0;
        while x < mask.width() {
            if mask.alpha(x, y) > ALPHA_CUTOFF {
                points.push(TargetPoint {
                    pos: Vec2::new(x as f32 + ox, y as f32 + oy),
                    guide,
                });
            }
            x += stride;
        }
        y += stride;
    }

    if points.len() > budget {
        rng.shuffle(&mut points);
        points.truncate(budget);
    }
    points
}
