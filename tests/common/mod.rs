#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Paints the inclusive rectangle (x0, y0)-(x1, y1).
pub fn paint_rect(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

pub fn write_png(path: &Path, img: &RgbaImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("write png file");
}

/// The 120x80 white baseline and the current image with a black block at
/// (20,15)-(55,45), written as `baseline.png` and `current.png` in `dir`.
pub fn write_block_pair(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let baseline = solid(120, 80, WHITE);
    let mut current = baseline.clone();
    paint_rect(&mut current, 20, 15, 55, 45, BLACK);

    let b = dir.join("baseline.png");
    let c = dir.join("current.png");
    write_png(&b, &baseline);
    write_png(&c, &current);
    (b, c)
}
