//! Coordinate space marker types.
//!
//! These are zero-sized types (ZSTs) used as type parameters to distinguish
//! pixel geometry from geometry expressed as fractions of the image size.

use std::fmt;

/// Marker type for pixel coordinates (absolute values).
///
/// (0, 0) is the top-left pixel of the compared rasters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Marker type for relative coordinates (0.0 to 1.0).
///
/// Relative coordinates divide x/w by the image width and y/h by the image
/// height, so captures of the same UI at different sizes stay comparable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
