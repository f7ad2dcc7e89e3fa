//! Error types for the color system

use thiserror::Error;

/// Result type for color operations
pub type ColorResult<T> = Result<T, ColorError>;

/// Errors that can occur when working with colors and gradients
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    /// Channel value outside its model's range
    #[error("{channel} = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        channel: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Gradient preset name not in the known set
    #[error("unknown gradient: {0}")]
    UnknownPreset(String),

    /// Binning mode other than `hist` or `ramp`
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Bounds or bin count that cannot produce a gradient
    #[error("invalid binning: {0}")]
    InvalidBinning(String),

    /// Invalid color value
    #[error("invalid color value: {0}")]
    InvalidValue(String),

    /// Color not found by name or index
    #[error("color not found: {0}")]
    NotFound(String),
}
