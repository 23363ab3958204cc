//! Text colour parsing.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA colour used to fill glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextColor(pub Rgba<u8>);

impl TextColor {
    pub const BLACK: Self = Self(Rgba([0, 0, 0, 255]));
    pub const WHITE: Self = Self(Rgba([255, 255, 255, 255]));
    pub const TRANSPARENT: Self = Self(Rgba([0, 0, 0, 0]));
    /// Fully opaque white, the same pixel as [`TextColor::WHITE`].
    pub const OPAQUE: Self = Self(Rgba([255, 255, 255, 255]));

    pub fn rgba(&self) -> Rgba<u8> {
        self.0
    }

    pub fn is_transparent(&self) -> bool {
        self.0[3] == 0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = channel(&hex[0..1].repeat(2))?;
                let g = channel(&hex[1..2].repeat(2))?;
                let b = channel(&hex[2..3].repeat(2))?;
                Some(Self(Rgba([r, g, b, 255])))
            }
            6 | 8 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                let a = if hex.len() == 8 {
                    channel(&hex[6..8])?
                } else {
                    255
                };
                Some(Self(Rgba([r, g, b, a])))
            }
            _ => None,
        }
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for TextColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "transparent" => Ok(Self::TRANSPARENT),
            "opaque" => Ok(Self::OPAQUE),
            _ => Self::from_hex(s).ok_or_else(|| {
                format!("unrecognised colour '{s}' (expected a name or #rgb/#rrggbb/#rrggbbaa)")
            }),
        }
    }
}

impl TryFrom<String> for TextColor {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TextColor> for String {
    fn from(c: TextColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0 .0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}
