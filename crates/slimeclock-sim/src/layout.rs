//! Viewport-driven placement of the digit groups and separator

use crate::glyph::TargetPoint;
use slimeclock_core::{Vec2, Rect, DISC_RADIUS};

/// Aspect ratio (height / width) at which the layout flips to tall
pub const TALL_ASPECT_MIN: f32 = 1.18;
/// Vertical stretch applied to digit targets (not the separator) in tall mode
pub const TALL_DIGIT_STRETCH: f32 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Digit groups side by side with a vertical colon
    Wide,
    /// Digit groups stacked with a horizontal two-dot separator
    Tall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStyle {
    Colon,
    TwoDots,
}

/// Anchor and font size for one glyph group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupPlacement {
    pub center: Vec2,
    pub font_size: f32,
}

/// Placement of all three groups, derived from the visible viewport
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub mode: LayoutMode,
    pub view: Rect,
    pub hours: GroupPlacement,
    pub minutes: GroupPlacement,
    pub separator: GroupPlacement,
    pub separator_style: SeparatorStyle,
}

impl Layout {
    pub fn compute(view: Rect) -> Self {
        let vw = view.width().max(1.0);
        let vh = view.height();
        let c = view.center();

        if view.aspect() >= TALL_ASPECT_MIN {
            // portrait: stacked digits, slightly smaller
            let size = (vw * 0.90).min(vh * 0.27).clamp(140.0, 540.0);
            let dy = size * 0.82;
            Self {
                mode: LayoutMode::Tall,
                view,
                hours: GroupPlacement {
                    center: Vec2::new(c.x, c.y - dy),
                    font_size: size,
                },
                minutes: GroupPlacement {
                    center: Vec2::new(c.x, c.y + dy),
                    font_size: size,
                },
                separator: GroupPlacement {
                    center: c,
                    font_size: size * 0.24,
                },
                separator_style: SeparatorStyle::TwoDots,
            }
        } else {
            // landscape: cap by both height and width so digits neither
            // explode on ultrawide screens nor collapse on small laptops
            let pad_x = (vw * 0.06).max(24.0);
            let pad_y = (vh * 0.06).max(24.0);
            let mut size = (vh * 0.55).min(vw * 0.265).clamp(160.0, 680.0);
            size = size.min(((vh - pad_y * 2.0) * 0.95).max(120.0));

            // spacing ties to size but still has to fit inside the view
            let digit_half_w = size * 0.54;
            let dx_limit = (size * 0.56).max(vw * 0.5 - pad_x - digit_half_w);
            let dx = (size * 0.86).min(dx_limit);

            Self {
                mode: LayoutMode::Wide,
                view,
                hours: GroupPlacement {
                    center: Vec2::new(c.x - dx, c.y),
                    font_size: size,
                },
                minutes: GroupPlacement {
                    center: Vec2::new(c.x + dx, c.y),
                    font_size: size,
                },
                separator: GroupPlacement {
                    center: Vec2::new(c.x, c.y - size * 0.06),
                    font_size: size * 0.33,
                },
                separator_style: SeparatorStyle::Colon,
            }
        }
    }
}

/// Scale target points around `anchor` — the tall layout's digit stretch
pub fn stretch_targets(targets: &mut [TargetPoint], anchor: Vec2, sx: f32, sy: f32) {
    for t in targets {
        t.pos.x = anchor.x + (t.pos.x - anchor.x) * sx;
        t.pos.y = anchor.y + (t.pos.y - anchor.y) * sy;
    }
}

/// Half-extents of the displayed clock around the view center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBounds {
    pub half_w: f32,
    pub half_h: f32,
}

impl TargetBounds {
    pub const DEFAULT: Self = Self {
        half_w: 720.0,
        half_h: 340.0,
    };
}

/// Compute trimmed bounds of the sampled targets with a stamp/blur margin.
/// Too few points (< 8) to be trustworthy falls back to the default extents.
pub fn target_bounds(points: &[TargetPoint], center: Vec2, blur: f32) -> TargetBounds {
    if points.len() < 8 {
        return TargetBounds::DEFAULT;
    }

    let mut xs: Vec<f32> = points.iter().map(|t| t.pos.x).collect();
    let mut ys: Vec<f32> = points.iter().map(|t| t.pos.y).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    ys.sort_by(|a, b| a.total_cmp(b));

    // drop extreme stragglers (0.2% per side)
    let trim = ((xs.len() as f32 * 0.002).floor() as usize).min(xs.len() - 1);
    let (min_x, max_x) = (xs[trim], xs[xs.len() - 1 - trim]);
    let (min_y, max_y) = (ys[trim], ys[ys.len() - 1 - trim]);

    let extra = (DISC_RADIUS * 0.85 + blur * 0.40 + 2.0).ceil();
    TargetBounds {
        half_w: (center.x - min_x).max(max_x - center.x) + extra,
        half_h: (center.y - min_y).max(max_y - center.y) + extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_threshold_selects_mode() {
        // 1.5:1 landscape
        let wide = Layout::compute(Rect::from_size(1500.0, 1000.0));
        assert_eq!(wide.mode, LayoutMode::Wide);
        assert_eq!(wide.separator_style, SeparatorStyle::Colon);

        // 1:1.3 portrait — past the 1.18 threshold
        let tall = Layout::compute(Rect::from_size(1000.0, 1300.0));
        assert_eq!(tall.mode, LayoutMode::Tall);
        assert_eq!(tall.separator_style, SeparatorStyle::TwoDots);

        // just under the threshold stays wide
        let square = Layout::compute(Rect::from_size(1000.0, 1170.0));
        assert_eq!(square.mode, LayoutMode::Wide);
    }

    #[test]
    fn wide_layout_is_symmetric() {
        let l = Layout::compute(Rect::from_size(1920.0, 1080.0));
        let c = l.view.center();
        assert!((c.x - l.hours.center.x) > 0.0);
        assert!((l.minutes.center.x - c.x) > 0.0);
        assert!(((c.x - l.hours.center.x) - (l.minutes.center.x - c.x)).abs() < 1e-3);
        assert_eq!(l.hours.font_size, l.minutes.font_size);
        assert!(l.separator.font_size < l.hours.font_size);
    }

    #[test]
    fn tall_layout_stacks_groups() {
        let l = Layout::compute(Rect::from_size(1080.0, 1920.0));
        assert!(l.hours.center.y < l.separator.center.y);
        assert!(l.separator.center.y < l.minutes.center.y);
        assert!((l.hours.center.x - l.minutes.center.x).abs() < 1e-3);
    }

    #[test]
    fn font_size_stays_clamped() {
        let tiny = Layout::compute(Rect::from_size(320.0, 200.0));
        assert!(tiny.hours.font_size >= 120.0);
        let huge = Layout::compute(Rect::from_size(10_000.0, 5000.0));
        assert!(huge.hours.font_size <= 680.0);
    }

    #[test]
    fn stretch_scales_around_anchor() {
        let anchor = Vec2::new(100.0, 200.0);
        let mut targets = vec![
            TargetPoint {
                pos: Vec2::new(100.0, 100.0),
                guide: false,
            },
            TargetPoint {
                pos: Vec2::new(140.0, 200.0),
                guide: false,
            },
        ];
        stretch_targets(&mut targets, anchor, 1.0, TALL_DIGIT_STRETCH);
        // anchor-relative y scaled by 1.15, x untouched
        assert!((targets[0].pos.y - (200.0 - 100.0 * 1.15)).abs() < 1e-3);
        assert_eq!(targets[0].pos.x, 100.0);
        assert_eq!(targets[1].pos, Vec2::new(140.0, 200.0));
    }

    #[test]
    fn bounds_fall_back_when_sparse() {
        let points: Vec<TargetPoint> = (0..7)
            .map(|i| TargetPoint {
                pos: Vec2::new(i as f32, 0.0),
                guide: false,
            })
            .collect();
        let b = target_bounds(&points, Vec2::ZERO, 3.0);
        assert_eq!(b, TargetBounds::DEFAULT);
    }

    #[test]
    fn bounds_cover_targets_with_margin() {
        let points: Vec<TargetPoint> = (0..100)
            .map(|i| TargetPoint {
                pos: Vec2::new(i as f32, (i % 10) as f32),
                guide: false,
            })
            .collect();
        let center = Vec2::new(50.0, 5.0);
        let b = target_bounds(&points, center, 3.0);
        let extra = (DISC_RADIUS * 0.85 + 3.0 * 0.40 + 2.0).ceil();
        assert!((b.half_w - (50.0 + extra)).abs() < 1e-3);
        assert!(b.half_h >= 5.0);
    }
}
