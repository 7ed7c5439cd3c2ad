//! Slimeclock Core - shared types and utilities
//!
//! Leaf crate for the slimeclock engine:
//! - `Vec2` / `Rect` / `Color` — 2-D geometry and color types
//! - easing functions, including the parametrized expo overshoot blend
//! - `SlimeError` — the error type for engine operations
//! - `Tuning` / `RenderTier` — per-device performance tuning

pub mod config;
pub mod ease;
pub mod error;
pub mod types;

pub use config::{RenderTier, Tuning, BLUR_AMOUNT, DISC_RADIUS};
pub use error::{Result, SlimeError};
pub use types::{Color, Rect, Vec2};
