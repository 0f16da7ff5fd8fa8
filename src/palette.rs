//! Named colors used by the scene.
//!
//! Colors are authored as sRGB hex (`"#FFD700"`) and converted to linear RGB
//! before they reach a shader, since the surface format is sRGB.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An sRGB color stored as 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    /// Linear-light RGB in `0.0..=1.0`.
    pub fn to_linear(self) -> Vec3 {
        Vec3::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }
}

fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::Color(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| ConfigError::Color(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// The six named colors of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Foliage base hue.
    pub emerald_deep: Color,
    pub emerald_light: Color,
    /// Foliage accent and key light.
    pub gold_high_gloss: Color,
    pub gold_rose: Color,
    pub silver: Color,
    /// Ornament color and fill light.
    pub red_velvet: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            emerald_deep: Color::from_hex(0x004225),
            emerald_light: Color::from_hex(0x0B6623),
            gold_high_gloss: Color::from_hex(0xFFD700),
            gold_rose: Color::from_hex(0xE6BE8A),
            silver: Color::from_hex(0xC0C0C0),
            red_velvet: Color::from_hex(0x800020),
        }
    }
}

impl Palette {
    /// Colors an ornament may be painted with, chosen uniformly.
    pub fn ornament_colors(&self) -> [Color; 4] {
        [
            self.gold_high_gloss,
            self.gold_rose,
            self.silver,
            self.red_velvet,
        ]
    }
}
