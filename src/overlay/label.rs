//! Bitmap labels drawn above region boxes.
//!
//! Labels use the 8x8 glyphs from `font8x8`. If a glyph of the preferred
//! `Δ<n>` label is missing the plain `D<n>` form is used instead, and if that
//! cannot be rendered either the label is skipped. None of this is an error.

use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS};
use image::Rgba;
use imageproc::drawing::{draw_filled_rect_mut, Canvas};
use imageproc::rect::Rect;
use tracing::warn;

use crate::annotate::region_label;

/// Glyph cell size in pixels.
pub const GLYPH_SIZE: u32 = 8;
/// Horizontal offset of the label from the box's left edge.
pub const LABEL_DX: i32 = 4;
/// Vertical offset of the label above the box's top edge.
pub const LABEL_DY: i32 = 12;

pub const LABEL_FG: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const LABEL_BG: Rgba<u8> = Rgba([255, 69, 58, 220]);

pub type Glyph = [u8; 8];

/// Looks up a glyph in the basic Latin then the Greek table.
pub fn lookup_glyph(ch: char) -> Option<Glyph> {
    BASIC_FONTS.get(ch).or_else(|| GREEK_FONTS.get(ch))
}

/// Glyphs for every character of `text`, or `None` if any is missing.
pub fn glyphs_with<F>(text: &str, lookup: F) -> Option<Vec<Glyph>>
where
    F: Fn(char) -> Option<Glyph>,
{
    text.chars().map(lookup).collect()
}

/// Picks the label text for `rank` and its glyphs.
pub fn resolve_label_with<F>(rank: u32, lookup: F) -> Option<(String, Vec<Glyph>)>
where
    F: Fn(char) -> Option<Glyph>,
{
    let preferred = region_label(rank);
    if let Some(glyphs) = glyphs_with(&preferred, &lookup) {
        return Some((preferred, glyphs));
    }

    let ascii = format!("D{rank}");
    match glyphs_with(&ascii, &lookup) {
        Some(glyphs) => {
            warn!(label = %preferred, fallback = %ascii, "label glyph unavailable, using ascii label");
            Some((ascii, glyphs))
        }
        None => {
            warn!(label = %preferred, "label glyphs unavailable, omitting label");
            None
        }
    }
}

/// Draws the label for the box whose top-left corner is (`box_x`, `box_y`).
///
/// Returns the text drawn, or `None` if the label was omitted.
pub fn draw_region_label<C>(canvas: &mut C, box_x: u32, box_y: u32, rank: u32) -> Option<String>
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    draw_label_with(canvas, box_x, box_y, rank, lookup_glyph)
}

pub(crate) fn draw_label_with<C, F>(
    canvas: &mut C,
    box_x: u32,
    box_y: u32,
    rank: u32,
    lookup: F,
) -> Option<String>
where
    C: Canvas<Pixel = Rgba<u8>>,
    F: Fn(char) -> Option<Glyph>,
{
    let (text, glyphs) = resolve_label_with(rank, lookup)?;

    let tx = box_x as i32 + LABEL_DX;
    let ty = (box_y as i32 - LABEL_DY).max(0);
    let text_w = GLYPH_SIZE * glyphs.len() as u32;

    let bg = Rect::at(tx - 2, ty - 1).of_size(text_w + 4, GLYPH_SIZE + 2);
    draw_filled_rect_mut(canvas, bg, LABEL_BG);

    let (width, height) = canvas.dimensions();
    for (i, glyph) in glyphs.iter().enumerate() {
        let gx = tx + (i as u32 * GLYPH_SIZE) as i32;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // bit 0 is the leftmost column
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = gx + col as i32;
                let py = ty + row as i32;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    canvas.draw_pixel(px as u32, py as u32, LABEL_FG);
                }
            }
        }
    }

    Some(text)
}
