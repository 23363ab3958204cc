//! Drawing a centered line of text onto a copy of the template.

use image::{Rgba, RgbaImage};
use rusttype::point;

use crate::color::TextColor;
use crate::fonts::Face;

/// Horizontal start of a line of `measured_width` pixels centered in
/// `image_width`. Negative when the text is wider than the image.
pub fn start_x(image_width: u32, measured_width: f32) -> f32 {
    (image_width as f32 - measured_width.round()) / 2.0
}

/// Copy `background` and draw `text` centered horizontally with its baseline
/// at `baseline_y`. Glyph pixels outside the image are dropped.
pub fn render(
    background: &RgbaImage,
    face: &Face,
    color: TextColor,
    text: &str,
    baseline_y: f32,
) -> RgbaImage {
    let mut canvas = background.clone();
    draw_centered(&mut canvas, face, color, text, baseline_y);
    canvas
}

/// Draw `text` centered on `canvas` in place.
fn draw_centered(
    canvas: &mut RgbaImage,
    face: &Face,
    color: TextColor,
    text: &str,
    baseline_y: f32,
) {
    let run = face.layout(text);
    let origin_x = start_x(canvas.width(), run.width);
    log::trace!(
        "'{text}': width {:.1}px, origin ({origin_x:.1}, {baseline_y:.1})",
        run.width
    );

    if color.is_transparent() {
        return;
    }

    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let src = color.rgba();

    for placed in run.glyphs {
        let pos = point(face.snap(origin_x + placed.x), face.snap(baseline_y));
        let glyph = placed.glyph.positioned(pos);
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        if bb.max.x <= 0 || bb.min.x >= w || bb.max.y <= 0 || bb.min.y >= h {
            continue;
        }
        glyph.draw(|gx, gy, coverage| {
            let px = bb.min.x + gx as i32;
            let py = bb.min.y + gy as i32;
            if px < 0 || py < 0 || px >= w || py >= h {
                return;
            }
            blend_over(canvas.get_pixel_mut(px as u32, py as u32), src, coverage);
        });
    }
}

/// Straight-alpha source-over of `src` scaled by glyph `coverage`.
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = coverage.clamp(0.0, 1.0) * src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
