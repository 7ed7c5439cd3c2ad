//! Per-device render tiers and tuning (parsed from TOML)

use crate::error::{Result, SlimeError};
use serde::{Deserialize, Serialize};

/// Stamp radius of one particle disc, in full-resolution pixels. The wall
/// padding and glyph-bounds margin derive from this as well.
pub const DISC_RADIUS: f32 = 14.0;

/// Blur radius applied to the density buffer before thresholding. Small on
/// purpose: less blur keeps the silhouette edge sharp.
pub const BLUR_AMOUNT: f32 = 3.0;

/// Device performance tier. Picks render budgets and the density buffer
/// resolution cap; the host decides the tier (device memory, core count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTier {
    High,
    Mobile,
    Low,
}

/// Tunable limits that vary per tier. Everything else in the engine is a
/// fixed constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    /// Particles drawn per frame for the hour digits
    pub render_budget_hours: usize,
    /// Particles drawn per frame for the minute digits
    pub render_budget_minutes: usize,
    /// Particles drawn per frame for the separator
    pub render_budget_separator: usize,
    /// Density buffer pixel cap; the buffer downscale factor derives from it
    pub max_density_pixels: usize,
    /// Minimum interval between accepted presence readings (ms)
    pub detect_min_interval_ms: f64,
    /// Second, larger and fainter stamp pass for outline smoothing
    pub outline_pass: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::for_tier(RenderTier::High)
    }
}

impl Tuning {
    pub fn for_tier(tier: RenderTier) -> Self {
        match tier {
            RenderTier::High => Self {
                render_budget_hours: 1400,
                render_budget_minutes: 1400,
                render_budget_separator: 90,
                max_density_pixels: 540_000,
                detect_min_interval_ms: 110.0,
                outline_pass: true,
            },
            RenderTier::Mobile => Self {
                render_budget_hours: 340,
                render_budget_minutes: 340,
                render_budget_separator: 70,
                max_density_pixels: 320_000,
                detect_min_interval_ms: 170.0,
                outline_pass: false,
            },
            RenderTier::Low => Self {
                render_budget_hours: 240,
                render_budget_minutes: 240,
                render_budget_separator: 55,
                max_density_pixels: 240_000,
                detect_min_interval_ms: 230.0,
                outline_pass: false,
            },
        }
    }

    /// Parse tuning overrides from a TOML table. Starts from the table's
    /// `tier` preset (default: high); absent keys keep the preset value.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let tier = match table.get("tier").and_then(|v| v.as_str()) {
            Some("mobile") => RenderTier::Mobile,
            Some("low") => RenderTier::Low,
            _ => RenderTier::High,
        };
        let mut tuning = Self::for_tier(tier);

        if let Some(v) = table.get("render_budget_hours") {
            tuning.render_budget_hours = toml_usize(v, tuning.render_budget_hours);
        }
        if let Some(v) = table.get("render_budget_minutes") {
            tuning.render_budget_minutes = toml_usize(v, tuning.render_budget_minutes);
        }
        if let Some(v) = table.get("render_budget_separator") {
            tuning.render_budget_separator = toml_usize(v, tuning.render_budget_separator);
        }
        if let Some(v) = table.get("max_density_pixels") {
            tuning.max_density_pixels = toml_usize(v, tuning.max_density_pixels).max(4096);
        }
        if let Some(v) = table.get("detect_min_interval_ms") {
            tuning.detect_min_interval_ms = toml_f64(v, tuning.detect_min_interval_ms).max(0.0);
        }
        if let Some(v) = table.get("outline_pass") {
            tuning.outline_pass = v.as_bool().unwrap_or(tuning.outline_pass);
        }

        tuning
    }

    /// Parse tuning overrides from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(s)?;
        Ok(Self::from_toml(&table))
    }

    /// Check limits a host could have mangled through overrides.
    pub fn validate(&self) -> Result<()> {
        let budgets = [
            ("render_budget_hours", self.render_budget_hours),
            ("render_budget_minutes", self.render_budget_minutes),
            ("render_budget_separator", self.render_budget_separator),
        ];
        for (field, value) in budgets {
            if value == 0 || value > 10_000 {
                return Err(SlimeError::ValueOutOfRange {
                    field: field.to_string(),
                    min: 1.0,
                    max: 10_000.0,
                    value: value as f64,
                });
            }
        }
        if !(0.0..=10_000.0).contains(&self.detect_min_interval_ms) {
            return Err(SlimeError::ValueOutOfRange {
                field: "detect_min_interval_ms".to_string(),
                min: 0.0,
                max: 10_000.0,
                value: self.detect_min_interval_ms,
            });
        }
        Ok(())
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn toml_f64(v: &toml::Value, default: f64) -> f64 {
    v.as_float()
        .or_else(|| v.as_integer().map(|i| i as f64))
        .unwrap_or(default)
}

fn toml_usize(v: &toml::Value, default: usize) -> usize {
    v.as_integer()
        .map(|i| i.max(1) as usize)
        .unwrap_or(default)
}
