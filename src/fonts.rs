//! Font loading and text measurement.
//!
//! Font bytes are validated with `ttf-parser` (which also gives us the family
//! name and basic metrics), then handed to `rusttype` for glyph layout and
//! rasterization. A [`Face`] binds a font to a size, DPI and hinting mode; it
//! is built once per run and shared read-only by every record.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rusttype::{Font, GlyphId, Scale, ScaledGlyph};
use serde::{Deserialize, Serialize};

use crate::error::{CertError, Result};

/// Resolution at which one point equals one pixel.
pub const BASE_DPI: f32 = 72.0;

/// Raw font program bytes, as read from disk.
#[derive(Clone)]
pub struct FontData {
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A parsed font, not yet bound to a size.
#[derive(Clone)]
pub struct FontHandle {
    font: Font<'static>,
    family: Option<String>,
    units_per_em: u16,
    glyph_count: u16,
}

/// How glyph positions are snapped to the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hinting {
    /// Keep fractional advances and origins.
    None,
    /// Snap advances to whole pixels.
    Vertical,
    /// Snap advances to whole pixels (default).
    #[default]
    Full,
}

/// Size, resolution and hinting for a [`Face`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceOptions {
    /// Font size in points.
    pub size: f32,
    pub dpi: f32,
    pub hinting: Hinting,
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            size: 100.0,
            dpi: BASE_DPI,
            hinting: Hinting::Full,
        }
    }
}

/// A font bound to a concrete size, able to measure and lay out text.
#[derive(Clone)]
pub struct Face {
    font: Font<'static>,
    options: FaceOptions,
    scale: Scale,
    pixels_per_em: f32,
}

/// A glyph with its pen offset from the run origin, in pixels.
pub struct PlacedGlyph {
    pub x: f32,
    pub glyph: ScaledGlyph<'static>,
}

/// Glyphs of one string laid out left to right from x = 0.
pub struct GlyphRun {
    pub glyphs: Vec<PlacedGlyph>,
    /// Total advance, including kerning.
    pub width: f32,
}

/// Read a font file into memory.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| CertError::io(path, e))?;
    log::debug!("read {} font bytes from '{}'", bytes.len(), path.display());
    Ok(FontData { bytes })
}

/// Validate and parse font bytes.
pub fn parse_font(data: FontData) -> Result<FontHandle> {
    let (family, units_per_em, glyph_count) = {
        let face = ttf_parser::Face::parse(&data.bytes, 0).map_err(|e| CertError::FontParse {
            reason: e.to_string(),
        })?;
        (
            family_name(&face),
            face.units_per_em(),
            face.number_of_glyphs(),
        )
    };

    let font = Font::try_from_vec(data.bytes).ok_or_else(|| CertError::FontParse {
        reason: "font tables are not usable for rasterization".to_string(),
    })?;

    Ok(FontHandle {
        font,
        family,
        units_per_em,
        glyph_count,
    })
}

fn family_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == ttf_parser::name_id::FAMILY)
        .find_map(|n| n.to_string())
}

/// Bind a parsed font to a size, resolution and hinting mode.
pub fn make_face(handle: &FontHandle, options: FaceOptions) -> Result<Face> {
    if !options.size.is_finite() || options.size <= 0.0 {
        return Err(CertError::Config(format!(
            "font size must be a positive number, got {}",
            options.size
        )));
    }
    if !options.dpi.is_finite() || options.dpi <= 0.0 {
        return Err(CertError::Config(format!(
            "DPI must be a positive number, got {}",
            options.dpi
        )));
    }

    let pixels_per_em = options.size * options.dpi / BASE_DPI;

    // rusttype scales so that ascent - descent spans `Scale.y` pixels; convert
    // from an em-based size.
    let v = handle.font.v_metrics_unscaled();
    let extent = v.ascent - v.descent;
    let height = if extent > 0.0 {
        pixels_per_em * extent / handle.units_per_em as f32
    } else {
        pixels_per_em
    };

    Ok(Face {
        font: handle.font.clone(),
        options,
        scale: Scale::uniform(height),
        pixels_per_em,
    })
}

impl FontHandle {
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("family", &self.family)
            .field("units_per_em", &self.units_per_em)
            .field("glyph_count", &self.glyph_count)
            .finish()
    }
}

impl Face {
    pub fn pixels_per_em(&self) -> f32 {
        self.pixels_per_em
    }

    pub fn is_hinted(&self) -> bool {
        self.options.hinting != Hinting::None
    }

    pub(crate) fn snap(&self, v: f32) -> f32 {
        if self.is_hinted() {
            v.round()
        } else {
            v
        }
    }

    /// Lay out `text` as a single line, applying pair kerning.
    pub fn layout(&self, text: &str) -> GlyphRun {
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut prev: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph = self.font.glyph(ch).scaled(self.scale);
            if let Some(prev) = prev {
                pen += self.snap(self.font.pair_kerning(self.scale, prev, glyph.id()));
            }
            let advance = self.snap(glyph.h_metrics().advance_width);
            prev = Some(glyph.id());
            glyphs.push(PlacedGlyph { x: pen, glyph });
            pen += advance;
        }

        GlyphRun { glyphs, width: pen }
    }

    /// Rendered width of `text` in pixels: glyph advances plus kerning.
    pub fn measure(&self, text: &str) -> f32 {
        self.layout(text).width
    }

    /// Characters of `text` the font has no glyph for.
    pub fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let mut missing: Vec<char> = text
            .chars()
            .filter(|c| !c.is_control() && self.font.glyph(*c).id().0 == 0)
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

impl fmt::Debug for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("options", &self.options)
            .field("pixels_per_em", &self.pixels_per_em)
            .finish()
    }
}

impl FromStr for Hinting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "vertical" => Ok(Self::Vertical),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown hinting mode '{other}' (expected none, vertical or full)"
            )),
        }
    }
}

impl fmt::Display for Hinting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Vertical => "vertical",
            Self::Full => "full",
        })
    }
}
