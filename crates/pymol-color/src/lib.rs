//! PyMOL-RS Color System
//!
//! This crate provides the color math behind the Colorama tool:
//! - RGB (8-bit) and HSV color types with an exact round-trip conversion
//! - A dual-representation [`ColorModel`] for slider editing
//! - Gradient presets, specs and binning over a numeric attribute
//! - A named color table

mod color;
mod error;
pub mod gradient;
mod hsv;
mod model;
mod named;

pub use color::{Color, Rgb8};
pub use error::{ColorError, ColorResult};
pub use gradient::{
    assign_bins, compute_bins, BinAssignment, BinColor, BinPredicate, GradientMode, GradientPath,
    GradientPreset, GradientSpec, Midpoint, FALLBACK_BIN_COUNT, MAX_BIN_COUNT,
};
pub use hsv::{hsv_to_rgb, rgb_to_hsv, Hsv};
pub use model::{ChannelRange, ColorMode, ColorModel};
pub use named::NamedColors;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{Color, ColorMode, ColorModel, GradientPreset, GradientSpec, Hsv, NamedColors, Rgb8};
}
