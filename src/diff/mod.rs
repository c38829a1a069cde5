//! Pixel differencing.
//!
//! Turns two same-size RGBA rasters into a [`DifferenceGrid`] of scalar
//! magnitudes plus a [`DiffSummary`] of global statistics. Alpha is ignored:
//! only the color channels contribute.

mod grid;

pub use grid::DifferenceGrid;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ShotdiffError;

/// Rule for combining per-channel absolute differences into one magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMetric {
    /// ITU-R BT.601 luma of the absolute channel differences.
    #[default]
    Luma,
    /// Largest absolute channel difference.
    #[serde(rename = "max")]
    #[value(name = "max")]
    MaxChannel,
}

impl DiffMetric {
    /// Combines absolute channel differences into a magnitude in 0..=255.
    #[inline]
    pub fn combine(self, dr: u8, dg: u8, db: u8) -> u8 {
        match self {
            DiffMetric::Luma => {
                let weighted = 299 * u32::from(dr) + 587 * u32::from(dg) + 114 * u32::from(db);
                ((weighted + 500) / 1000) as u8
            }
            DiffMetric::MaxChannel => dr.max(dg).max(db),
        }
    }
}

/// Global magnitude statistics over a difference grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub total_pixels: u64,
    /// Pixels whose magnitude is above 0.
    pub changed_pixels: u64,
    pub magnitude_sum: u64,
}

impl DiffSummary {
    /// Summarizes an existing grid.
    pub fn from_grid(grid: &DifferenceGrid) -> Self {
        let raw = grid.as_raw();
        Self {
            total_pixels: raw.len() as u64,
            changed_pixels: raw.iter().filter(|&&v| v > 0).count() as u64,
            magnitude_sum: raw.iter().map(|&v| u64::from(v)).sum(),
        }
    }

    /// Percentage of pixels whose magnitude is above 0.
    pub fn percent_changed(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.changed_pixels as f64 / self.total_pixels as f64 * 100.0
    }

    /// Mean magnitude as a percentage of the largest representable one.
    pub fn avg_diff_percent(&self) -> f64 {
        if self.total_pixels == 0 {
            return 0.0;
        }
        self.magnitude_sum as f64 / (255.0 * self.total_pixels as f64) * 100.0
    }
}

/// Computes the difference grid and its summary for two rasters.
///
/// # Errors
/// Returns [`ShotdiffError::DimensionMismatch`] if the rasters differ in size.
pub fn compute_difference(
    baseline: &RgbaImage,
    current: &RgbaImage,
    metric: DiffMetric,
) -> Result<(DifferenceGrid, DiffSummary), ShotdiffError> {
    if baseline.dimensions() != current.dimensions() {
        return Err(ShotdiffError::DimensionMismatch {
            baseline_width: baseline.width(),
            baseline_height: baseline.height(),
            current_width: current.width(),
            current_height: current.height(),
        });
    }

    let (width, height) = baseline.dimensions();
    let grid = DifferenceGrid::from_fn(width, height, |x, y| {
        let a = baseline.get_pixel(x, y);
        let b = current.get_pixel(x, y);
        metric.combine(
            a[0].abs_diff(b[0]),
            a[1].abs_diff(b[1]),
            a[2].abs_diff(b[2]),
        )
    });
    let summary = DiffSummary::from_grid(&grid);

    debug!(
        width,
        height,
        changed = summary.changed_pixels,
        metric = ?metric,
        "computed difference grid"
    );
    Ok((grid, summary))
}
