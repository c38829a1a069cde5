//! Visual overlays of a difference grid on the current raster.
//!
//! The heat layer is pure red whose alpha at each pixel is the grid value, so
//! stronger divergence reads as a stronger highlight. The annotated overlay
//! adds a stroked box and an ordinal label per region. Both are flattened to
//! RGB before encoding.

pub mod label;

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, Blend};
use imageproc::rect::Rect;
use tracing::debug;

use crate::diff::DifferenceGrid;
use crate::region::ChangeRegion;

/// Heat layer color; its alpha comes from the grid.
pub const HEAT_COLOR: [u8; 3] = [255, 0, 0];
/// Box stroke color.
pub const BOX_COLOR: Rgba<u8> = Rgba([255, 69, 58, 255]);
/// Box stroke width, drawn inward from the padded box edge.
pub const BOX_STROKE: u32 = 3;

/// Composites the heat layer over `current` with the "over" operator.
///
/// `current` and `grid` must share dimensions; cells outside the raster are
/// ignored.
pub fn composite_heat(current: &RgbaImage, grid: &DifferenceGrid) -> RgbaImage {
    let mut vis = current.clone();
    let (w, h) = vis.dimensions();
    let (gw, gh) = grid.dimensions();

    for y in 0..h.min(gh) {
        for x in 0..w.min(gw) {
            let alpha = grid.get(x, y);
            if alpha == 0 {
                continue;
            }
            let px = vis.get_pixel_mut(x, y);
            *px = over(HEAT_COLOR, alpha, *px);
        }
    }
    vis
}

fn over(fg: [u8; 3], fg_alpha: u8, bg: Rgba<u8>) -> Rgba<u8> {
    if fg_alpha == u8::MAX {
        return Rgba([fg[0], fg[1], fg[2], u8::MAX]);
    }
    let fa = f32::from(fg_alpha) / 255.0;
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);

    let channel = |f: u8, b: u8| -> u8 {
        let v = (f32::from(f) * fa + f32::from(b) * ba * (1.0 - fa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(fg[0], bg[0]),
        channel(fg[1], bg[1]),
        channel(fg[2], bg[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// The heat-only overlay, flattened.
pub fn render_heat_overlay(current: &RgbaImage, grid: &DifferenceGrid) -> DynamicImage {
    flatten(composite_heat(current, grid))
}

/// The heat overlay plus one box and label per region, in rank order.
///
/// Boxes are opaque and drawn straight onto the raster; label backgrounds are
/// blended.
pub fn render_annotated_overlay(
    current: &RgbaImage,
    grid: &DifferenceGrid,
    regions: &[ChangeRegion],
) -> DynamicImage {
    let mut canvas = Blend(composite_heat(current, grid));
    let mut labelled = 0usize;

    for region in regions {
        stroke_box(&mut canvas.0, region);
        if label::draw_region_label(&mut canvas, region.x, region.y, region.id.rank()).is_some() {
            labelled += 1;
        }
    }

    debug!(regions = regions.len(), labelled, "rendered annotated overlay");
    flatten(canvas.0)
}

fn stroke_box(canvas: &mut RgbaImage, region: &ChangeRegion) {
    for t in 0..BOX_STROKE {
        let (Some(w), Some(h)) = (
            region.w.checked_sub(2 * t).filter(|w| *w > 0),
            region.h.checked_sub(2 * t).filter(|h| *h > 0),
        ) else {
            break;
        };
        let rect = Rect::at((region.x + t) as i32, (region.y + t) as i32).of_size(w, h);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }
}

fn flatten(rgba: RgbaImage) -> DynamicImage {
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use crate::region::{rank_regions, RawRegion, TightBounds};

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn zero_grid_leaves_raster_unchanged() {
        let current = RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]));
        let grid = DifferenceGrid::filled(8, 6, 0);
        assert_eq!(composite_heat(&current, &grid), current);
    }

    #[test]
    fn full_grid_paints_red() {
        let current = white(4, 4);
        let grid = DifferenceGrid::filled(4, 4, 255);
        let out = render_heat_overlay(&current, &grid).to_rgb8();
        assert_eq!(*out.get_pixel(2, 2), image::Rgb([255, 0, 0]));
    }

    #[test]
    fn partial_alpha_tints() {
        let current = white(2, 2);
        let grid = DifferenceGrid::filled(2, 2, 128);
        let out = composite_heat(&current, &grid);
        let p = out.get_pixel(0, 0);
        assert_eq!(p[0], 255);
        assert_eq!(p[1], 127);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn annotated_overlay_strokes_region_box() {
        let current = white(60, 50);
        let grid = DifferenceGrid::filled(60, 50, 0);
        let raw = RawRegion {
            discovery: 0,
            tight: TightBounds::at(20, 20),
            pixels: 100,
            x: 20,
            y: 20,
            w: 20,
            h: 15,
            area: 300,
            coverage: 1.0 / 3.0,
        };
        let regions = rank_regions(vec![raw], 60, 50, 0);

        let out = render_annotated_overlay(&current, &grid, &regions).to_rgb8();
        let red = image::Rgb([255, 69, 58]);
        assert_eq!(*out.get_pixel(20, 25), red);
        assert_eq!(*out.get_pixel(22, 25), red);
        assert_eq!(*out.get_pixel(39, 30), red);
        assert_eq!(*out.get_pixel(30, 27), image::Rgb([255, 255, 255]));
        assert_eq!(*out.get_pixel(19, 25), image::Rgb([255, 255, 255]));
        assert_eq!(out.dimensions(), (60, 50));
    }

    #[test]
    fn thin_regions_do_not_panic() {
        let current = white(10, 10);
        let grid = DifferenceGrid::filled(10, 10, 0);
        let raw = RawRegion {
            discovery: 0,
            tight: TightBounds::at(9, 9),
            pixels: 1,
            x: 9,
            y: 9,
            w: 1,
            h: 1,
            area: 1,
            coverage: 1.0,
        };
        let regions = rank_regions(vec![raw], 10, 10, 0);
        let out = render_annotated_overlay(&current, &grid, &regions);
        assert_eq!(out.dimensions(), (10, 10));
    }
}
