//! The per-pixel difference magnitude grid.

use image::{GrayImage, Luma};

/// Width×height grid of 8-bit difference magnitudes, row-major.
///
/// 0 means the two rasters agree at that pixel, 255 means they diverge as
/// far as the channel rule allows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifferenceGrid {
    inner: GrayImage,
}

impl DifferenceGrid {
    /// Builds a grid from row-major magnitudes.
    ///
    /// Returns `None` if `data.len() != width * height`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        GrayImage::from_raw(width, height, data).map(|inner| Self { inner })
    }

    /// Builds a grid by evaluating `f` at every (x, y).
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        Self {
            inner: GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)])),
        }
    }

    /// A grid of the given size with every magnitude set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            inner: GrayImage::from_pixel(width, height, Luma([value])),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Magnitude at (x, y). Panics if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.inner.get_pixel(x, y)[0]
    }

    /// Row-major magnitudes.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Number of cells whose magnitude is strictly above `threshold`.
    pub fn count_above(&self, threshold: u8) -> u64 {
        self.as_raw().iter().filter(|&&v| v > threshold).count() as u64
    }
}
