//! Error types for slimeclock

use thiserror::Error;

/// The main error type for slimeclock operations
#[derive(Debug, Error)]
pub enum SlimeError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Layout error: {0}")]
    LayoutError(String),

    #[error("Glyph error: {0}")]
    GlyphError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for slimeclock operations
pub type Result<T> = std::result::Result<T, SlimeError>;

impl From<toml::de::Error> for SlimeError {
    fn from(err: toml::de::Error) -> Self {
        SlimeError::ConfigError(err.to_string())
    }
}
