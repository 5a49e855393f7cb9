//! Display colors for tracks and fixed markers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TrackError, TrackResult};

/// An opaque RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Start markers.
    pub const GREEN: Color = Color::new(0, 128, 0);
    /// End markers.
    pub const RED: Color = Color::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex color; the leading `#` is optional.
    pub fn from_hex(value: &str) -> TrackResult<Self> {
        let hex = value.trim_start_matches('#');
        // Byte-offset slicing below requires ASCII; a multi-byte char
        // at a slice boundary would panic otherwise.
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(TrackError::InvalidColor {
                value: value.to_string(),
            });
        }
        let parse = |range| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| TrackError::InvalidColor {
                value: value.to_string(),
            })
        };
        Ok(Color::new(parse(0..2)?, parse(2..4)?, parse(4..6)?))
    }

    /// RGBA byte quadruple at the given alpha.
    pub fn rgba(&self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl FromStr for Color {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}
