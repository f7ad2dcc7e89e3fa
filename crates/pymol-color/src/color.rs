//! Core color types

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGB color with float channels in the range [0.0, 1.0]
///
/// This is the representation the host viewer uses for color triples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new color from RGB values (0.0-1.0)
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Quantize to 8-bit channels, rounding to nearest
    pub fn to_rgb8(&self) -> Rgb8 {
        Rgb8::new(unit_to_u8(self.r as f64), unit_to_u8(self.g as f64), unit_to_u8(self.b as f64))
    }

    /// Convert to array
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    /// Neutral gray used whenever a color lookup fails
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5);
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

impl From<[f32; 3]> for Color {
    fn from(arr: [f32; 3]) -> Self {
        Color::new(arr[0], arr[1], arr[2])
    }
}

impl From<Rgb8> for Color {
    fn from(rgb: Rgb8) -> Self {
        rgb.to_color()
    }
}

/// An RGB color with integer channels in the range [0, 255]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb8 { r, g, b }
    }

    /// Mid gray, the initial value of every color slot
    pub const GRAY: Rgb8 = Rgb8::new(128, 128, 128);

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Rgb8::new(r, g, b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels scaled to [0.0, 1.0] in double precision
    pub fn to_unit(&self) -> [f64; 3] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        ]
    }

    /// Convert to the host's float representation
    pub fn to_color(&self) -> Color {
        let [r, g, b] = self.to_unit();
        Color::new(r as f32, g as f32, b as f32)
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Rgb8::GRAY
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(arr: [u8; 3]) -> Self {
        Rgb8::new(arr[0], arr[1], arr[2])
    }
}

/// Scale a unit float to a byte, rounding to nearest and saturating at the ends
pub(crate) fn unit_to_u8(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb8::new(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Rgb8::new(0, 0, 0).to_string(), "#000000");
        assert_eq!(Rgb8::from_hex("#0A0b0C"), Some(Rgb8::new(10, 11, 12)));
        assert_eq!(Rgb8::from_hex("12345"), None);
    }

    #[test]
    fn test_float_quantization_rounds() {
        // 0.5 * 255 = 127.5 rounds up
        assert_eq!(Color::GRAY.to_rgb8(), Rgb8::new(128, 128, 128));
        assert_eq!(Color::new(1.2, -0.1, 0.999).to_rgb8(), Rgb8::new(255, 0, 255));
    }

    #[test]
    fn test_byte_color_roundtrip() {
        for v in 0..=255u8 {
            let rgb = Rgb8::new(v, 255 - v, v / 2);
            assert_eq!(rgb.to_color().to_rgb8(), rgb);
        }
    }
}
