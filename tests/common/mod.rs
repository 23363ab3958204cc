//! Shared fixtures: a tiny synthetic TrueType font and template helpers.
//!
//! The font maps every printable ASCII character (U+0020..=U+007E) to a
//! filled rectangle. With 1000 units per em each glyph advances 600 units and
//! covers x = 50..550, y = 0..700, so at 100 px/em a glyph is a 50x70 px
//! block inside a 60 px advance.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

pub const UNITS_PER_EM: u16 = 1000;
pub const ADVANCE: u16 = 600;
pub const FIRST_CHAR: u16 = 0x20;
pub const LAST_CHAR: u16 = 0x7E;

fn be16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn be32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::new();
    be32(&mut t, 0x0001_0000); // version
    be32(&mut t, 0x0001_0000); // fontRevision
    be32(&mut t, 0); // checksumAdjustment
    be32(&mut t, 0x5F0F_3CF5); // magic
    be16(&mut t, 0x000B); // flags
    be16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    be16(&mut t, 0); // xMin
    be16(&mut t, 0); // yMin
    be16(&mut t, 600); // xMax
    be16(&mut t, 700); // yMax
    be16(&mut t, 0); // macStyle
    be16(&mut t, 8); // lowestRecPPEM
    be16(&mut t, 2); // fontDirectionHint
    be16(&mut t, 1); // indexToLocFormat: long
    be16(&mut t, 0); // glyphDataFormat
    assert_eq!(t.len(), 54);
    t
}

fn hhea_table(num_glyphs: u16, ascender: i16, descender: i16) -> Vec<u8> {
    let mut t = Vec::new();
    be32(&mut t, 0x0001_0000);
    be16(&mut t, ascender as u16);
    be16(&mut t, descender as u16);
    be16(&mut t, 0); // lineGap
    be16(&mut t, ADVANCE); // advanceWidthMax
    be16(&mut t, 0); // minLeftSideBearing
    be16(&mut t, 50); // minRightSideBearing
    be16(&mut t, 550); // xMaxExtent
    be16(&mut t, 1); // caretSlopeRise
    be16(&mut t, 0); // caretSlopeRun
    be16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0; 8]); // reserved
    be16(&mut t, 0); // metricDataFormat
    be16(&mut t, num_glyphs); // numberOfHMetrics
    assert_eq!(t.len(), 36);
    t
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    be32(&mut t, 0x0000_5000);
    be16(&mut t, num_glyphs);
    t
}

fn hmtx_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    for gid in 0..num_glyphs {
        be16(&mut t, if gid == 0 { 500 } else { ADVANCE });
        be16(&mut t, if gid == 0 { 0 } else { 50 });
    }
    t
}

/// One clockwise rectangle, 50..550 x 0..700.
fn box_glyph() -> Vec<u8> {
    let mut g = Vec::new();
    be16(&mut g, 1); // numberOfContours
    be16(&mut g, 50); // xMin
    be16(&mut g, 0); // yMin
    be16(&mut g, 550); // xMax
    be16(&mut g, 700); // yMax
    be16(&mut g, 3); // endPtsOfContours[0]
    be16(&mut g, 0); // instructionLength
    g.extend_from_slice(&[0x01; 4]); // on-curve, 16-bit deltas
    for dx in [50i16, 0, 500, 0] {
        be16(&mut g, dx as u16);
    }
    for dy in [0i16, 700, 0, -700] {
        be16(&mut g, dy as u16);
    }
    while g.len() % 4 != 0 {
        g.push(0);
    }
    g
}

fn glyf_and_loca(num_glyphs: u16) -> (Vec<u8>, Vec<u8>) {
    let glyph = box_glyph();
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    be32(&mut loca, 0);
    // glyph 0 (.notdef) is empty
    be32(&mut loca, 0);
    for _ in 1..num_glyphs {
        glyf.extend_from_slice(&glyph);
        be32(&mut loca, glyf.len() as u32);
    }
    (glyf, loca)
}

fn cmap_table() -> Vec<u8> {
    let mut t = Vec::new();
    be16(&mut t, 0); // version
    be16(&mut t, 1); // numTables
    be16(&mut t, 3); // platform: Windows
    be16(&mut t, 1); // encoding: Unicode BMP
    be32(&mut t, 12); // subtable offset

    let seg_count = 2u16;
    be16(&mut t, 4); // format
    be16(&mut t, 16 + 8 * seg_count); // length
    be16(&mut t, 0); // language
    be16(&mut t, seg_count * 2);
    be16(&mut t, 4); // searchRange
    be16(&mut t, 1); // entrySelector
    be16(&mut t, 0); // rangeShift
    be16(&mut t, LAST_CHAR); // endCode
    be16(&mut t, 0xFFFF);
    be16(&mut t, 0); // reservedPad
    be16(&mut t, FIRST_CHAR); // startCode
    be16(&mut t, 0xFFFF);
    be16(&mut t, 1u16.wrapping_sub(FIRST_CHAR)); // idDelta: U+0020 -> glyph 1
    be16(&mut t, 1);
    be16(&mut t, 0); // idRangeOffset
    be16(&mut t, 0);
    t
}

/// Bytes of a minimal TrueType font with box glyphs for printable ASCII.
/// Ascender 800 and descender -200 span exactly one em.
pub fn test_font_bytes() -> Vec<u8> {
    test_font_bytes_with_extent(800, -200)
}

/// Same glyphs as [`test_font_bytes`], with custom vertical metrics.
pub fn test_font_bytes_with_extent(ascender: i16, descender: i16) -> Vec<u8> {
    let num_glyphs = 1 + (LAST_CHAR - FIRST_CHAR + 1);
    let (glyf, loca) = glyf_and_loca(num_glyphs);

    // Table records must be sorted by tag.
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", cmap_table()),
        (b"glyf", glyf),
        (b"head", head_table()),
        (b"hhea", hhea_table(num_glyphs, ascender, descender)),
        (b"hmtx", hmtx_table(num_glyphs)),
        (b"loca", loca),
        (b"maxp", maxp_table(num_glyphs)),
    ];

    let num_tables = tables.len() as u16;
    let mut font = Vec::new();
    be32(&mut font, 0x0001_0000);
    be16(&mut font, num_tables);
    be16(&mut font, 64); // searchRange
    be16(&mut font, 2); // entrySelector
    be16(&mut font, num_tables * 16 - 64); // rangeShift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        be32(&mut font, 0); // checksum, not verified by parsers
        be32(&mut font, offset as u32);
        be32(&mut font, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend_from_slice(&body);
    font
}

/// Write the test font into `dir` and return its path.
pub fn write_test_font(dir: &Path) -> PathBuf {
    let path = dir.join("test-font.ttf");
    std::fs::write(&path, test_font_bytes()).unwrap();
    path
}

pub fn white_template(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
}

/// Write a white PNG template into `dir` and return its path.
pub fn write_white_template(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("template.png");
    white_template(width, height).save(&path).unwrap();
    path
}

pub fn write_records(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("names.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Pixels that are no longer pure white.
pub fn inked_columns(img: &RgbaImage) -> Vec<u32> {
    let mut cols: Vec<u32> = img
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 != [255, 255, 255, 255])
        .map(|(x, _, _)| x)
        .collect();
    cols.sort_unstable();
    cols.dedup();
    cols
}
