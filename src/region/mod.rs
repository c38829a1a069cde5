//! Change regions: extraction from a difference grid, then ranking.
//!
//! # Example
//!
//! ```
//! use shotdiff::diff::DifferenceGrid;
//! use shotdiff::region::{detect_regions, RegionOptions};
//!
//! let mut data = vec![0u8; 40 * 30];
//! for y in 5..15 {
//!     for x in 10..20 {
//!         data[y * 40 + x] = 200;
//!     }
//! }
//! let grid = DifferenceGrid::from_raw(40, 30, data).unwrap();
//! let regions = detect_regions(&grid, &RegionOptions::default());
//!
//! assert_eq!(regions.len(), 1);
//! assert_eq!(regions[0].id.to_string(), "change-1");
//! assert_eq!(regions[0].pixels, 100);
//! ```

mod extract;
mod ids;
mod model;
mod rank;

pub use extract::{extract_regions, ExtractOptions};
pub use ids::RegionId;
pub use model::{ChangeRegion, RawRegion, TightBounds, REGION_ACTION, REGION_INTENT};
pub use rank::{rank_regions, COVERAGE_PRECISION};

use crate::diff::DifferenceGrid;

/// Extraction plus ranking parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionOptions {
    pub extract: ExtractOptions,
    /// Display cap on the number of regions; 0 means unbounded.
    pub max_regions: usize,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            max_regions: 16,
        }
    }
}

/// Extracts and ranks the change regions of a grid.
pub fn detect_regions(grid: &DifferenceGrid, opts: &RegionOptions) -> Vec<ChangeRegion> {
    let raw = extract_regions(grid, &opts.extract);
    rank_regions(raw, grid.width(), grid.height(), opts.max_regions)
}
