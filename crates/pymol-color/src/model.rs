//! Dual RGB/HSV color model backing the slider editor
//!
//! A [`ColorModel`] holds exactly one authoritative representation: the one
//! that was edited last. The other view is computed on demand and is never
//! cached, so the two cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::color::{Color, Rgb8};
use crate::error::{ColorError, ColorResult};
use crate::hsv::Hsv;

/// The two supported color models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsv,
}

/// Numeric range of one slider channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ChannelRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl ColorMode {
    /// Labels shown above the three sliders
    pub fn channel_labels(&self) -> [&'static str; 3] {
        match self {
            ColorMode::Rgb => ["R", "G", "B"],
            ColorMode::Hsv => ["H", "S", "V"],
        }
    }

    /// Range shared by all three channels
    pub fn channel_range(&self) -> ChannelRange {
        match self {
            ColorMode::Rgb => ChannelRange {
                min: 0.0,
                max: 255.0,
                step: 1.0,
            },
            ColorMode::Hsv => ChannelRange {
                min: 0.0,
                max: 1.0,
                step: 0.01,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Rgb => "rgb",
            ColorMode::Hsv => "hsv",
        }
    }
}

/// One logical color, authoritative in either RGB or HSV
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorModel {
    Rgb(Rgb8),
    Hsv(Hsv),
}

impl Default for ColorModel {
    fn default() -> Self {
        ColorModel::Rgb(Rgb8::GRAY)
    }
}

impl ColorModel {
    /// Seed from a host float triple; RGB becomes authoritative
    pub fn from_color(color: Color) -> Self {
        ColorModel::Rgb(color.to_rgb8())
    }

    /// Which representation is authoritative
    pub fn mode(&self) -> ColorMode {
        match self {
            ColorModel::Rgb(_) => ColorMode::Rgb,
            ColorModel::Hsv(_) => ColorMode::Hsv,
        }
    }

    /// Set integer RGB channels, each in [0, 255]
    ///
    /// Out-of-range channels are rejected and leave the model untouched.
    pub fn set_rgb(&mut self, r: i32, g: i32, b: i32) -> ColorResult<()> {
        let r = byte_channel("r", r)?;
        let g = byte_channel("g", g)?;
        let b = byte_channel("b", b)?;
        *self = ColorModel::Rgb(Rgb8::new(r, g, b));
        Ok(())
    }

    /// Set float HSV channels, each in [0, 1]
    pub fn set_hsv(&mut self, h: f64, s: f64, v: f64) -> ColorResult<()> {
        *self = ColorModel::Hsv(Hsv::try_new(h, s, v)?);
        Ok(())
    }

    /// Set a slider triplet interpreted in `mode`
    ///
    /// RGB slider values must be whole numbers.
    pub fn set_channels(&mut self, mode: ColorMode, channels: [f64; 3]) -> ColorResult<()> {
        let [a, b, c] = channels;
        match mode {
            ColorMode::Rgb => {
                for value in channels {
                    if value.fract() != 0.0 {
                        return Err(ColorError::InvalidValue(format!(
                            "RGB channel {} is not a whole number",
                            value
                        )));
                    }
                }
                // `as` saturates, so huge values still fail the range check
                self.set_rgb(a as i32, b as i32, c as i32)
            }
            ColorMode::Hsv => self.set_hsv(a, b, c),
        }
    }

    pub fn to_rgb(&self) -> Rgb8 {
        match self {
            ColorModel::Rgb(rgb) => *rgb,
            ColorModel::Hsv(hsv) => hsv.to_rgb8(),
        }
    }

    pub fn to_hsv(&self) -> Hsv {
        match self {
            ColorModel::Rgb(rgb) => Hsv::from_rgb8(*rgb),
            ColorModel::Hsv(hsv) => *hsv,
        }
    }

    /// Host float triple of the RGB view
    pub fn to_color(&self) -> Color {
        self.to_rgb().to_color()
    }

    /// `#rrggbb` of the RGB view, for display only
    pub fn to_hex_string(&self) -> String {
        self.to_rgb().to_hex()
    }

    /// Make `mode` authoritative, converting the current value
    ///
    /// HSV values are kept at full precision; the 0.01 slider step is a
    /// display property and is not applied here.
    pub fn switch_mode(&mut self, mode: ColorMode) {
        if self.mode() == mode {
            return;
        }
        *self = match mode {
            ColorMode::Rgb => ColorModel::Rgb(self.to_rgb()),
            ColorMode::Hsv => ColorModel::Hsv(self.to_hsv()),
        };
    }

    /// Channel values in the authoritative representation, as slider positions
    pub fn channels(&self) -> [f64; 3] {
        match self {
            ColorModel::Rgb(rgb) => [rgb.r as f64, rgb.g as f64, rgb.b as f64],
            ColorModel::Hsv(hsv) => hsv.to_array(),
        }
    }
}

fn byte_channel(channel: &'static str, value: i32) -> ColorResult<u8> {
    u8::try_from(value).map_err(|_| ColorError::OutOfRange {
        channel,
        value: value as f64,
        min: 0.0,
        max: 255.0,
    })
}
