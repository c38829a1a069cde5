//! Change region types.

use serde::{Deserialize, Serialize};

use super::ids::RegionId;
use crate::geom::{BoxXYWH, Normalized};

/// Semantic tag carried by every region: what it is.
pub const REGION_INTENT: &str = "changed-region";
/// Semantic tag carried by every region: what to do with it.
pub const REGION_ACTION: &str = "inspect";

/// Tight extents of a cluster before padding, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TightBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TightBounds {
    /// Bounds of a single pixel.
    #[inline]
    pub fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Grows the bounds to include (x, y).
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// A connected cluster as found by the extractor, before ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct RawRegion {
    /// Position of the cluster in row-major discovery order.
    pub discovery: usize,
    pub tight: TightBounds,
    /// Number of active pixels in the cluster (not the box area).
    pub pixels: u64,
    /// Padded box, clamped to the grid.
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub area: u64,
    /// `pixels / area`, unrounded.
    pub coverage: f64,
}

/// A ranked change region, as reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Exclusive right edge (`x + w`).
    pub x2: u32,
    /// Exclusive bottom edge (`y + h`).
    pub y2: u32,
    pub pixels: u64,
    pub area: u64,
    /// Changed pixels over padded box area, rounded to 4 places.
    pub coverage: f64,
    pub intent: String,
    pub action: String,
    pub id: RegionId,
    pub rel: BoxXYWH<Normalized>,
    pub tight: TightBounds,
}
