//! HSV color representation and conversion to and from RGB
//!
//! The conversion pair is the usual hexcone model with every channel in
//! [0, 1]. Hue is cyclic: `h = 0.0` and `h = 1.0` are both red.
//!
//! Conversions run in `f64`. With rounding to nearest on the way back,
//! `Rgb8 -> Hsv -> Rgb8` reproduces every one of the 2^24 byte triples.

use serde::{Deserialize, Serialize};

use crate::color::{unit_to_u8, Rgb8};
use crate::error::{ColorError, ColorResult};

/// A color in hue/saturation/value space, each channel in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Hsv { h, s, v }
    }

    /// Create a checked HSV triple; every channel must lie in [0, 1]
    pub fn try_new(h: f64, s: f64, v: f64) -> ColorResult<Self> {
        check_unit("h", h)?;
        check_unit("s", s)?;
        check_unit("v", v)?;
        Ok(Hsv { h, s, v })
    }

    /// Convert an 8-bit RGB triple to HSV
    pub fn from_rgb8(rgb: Rgb8) -> Self {
        let [r, g, b] = rgb.to_unit();
        rgb_to_hsv(r, g, b)
    }

    /// Convert to 8-bit RGB, rounding each channel to nearest
    pub fn to_rgb8(&self) -> Rgb8 {
        let [r, g, b] = hsv_to_rgb(self.h, self.s, self.v);
        Rgb8::new(unit_to_u8(r), unit_to_u8(g), unit_to_u8(b))
    }

    /// Channel-wise linear interpolation, `t = 0` is `self`, `t = 1` is `other`
    ///
    /// Hue is interpolated as a plain number, so the sweep from 2/3 (blue)
    /// to 0 (red) passes through cyan, green and yellow.
    pub fn lerp(&self, other: &Hsv, t: f64) -> Hsv {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        Hsv {
            h: self.h + (other.h - self.h) * t,
            s: self.s + (other.s - self.s) * t,
            v: self.v + (other.v - self.v) * t,
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.h, self.s, self.v]
    }
}

impl From<Rgb8> for Hsv {
    fn from(rgb: Rgb8) -> Self {
        Hsv::from_rgb8(rgb)
    }
}

fn check_unit(channel: &'static str, value: f64) -> ColorResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange {
            channel,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

/// RGB (unit floats) to HSV
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return Hsv::new(0.0, 0.0, v);
    }

    let delta = max - min;
    let s = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;

    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    Hsv::new((h / 6.0).rem_euclid(1.0), s, v)
}

/// HSV to RGB (unit floats)
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }

    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
