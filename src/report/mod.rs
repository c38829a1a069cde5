//! The comparison report and its text formatting.
//!
//! The report is a pure aggregation of what the earlier stages produced. The
//! only computation here is rounding the global percentages.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diff::{DiffMetric, DiffSummary};
use crate::geom::round_to;
use crate::region::ChangeRegion;

/// Decimal places kept for the global percentages.
pub const PERCENT_PRECISION: u32 = 3;

/// Raster dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Absolute paths of the artifacts actually written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub diff_image: Option<PathBuf>,
    pub annotated_image: Option<PathBuf>,
    pub annotate_spec: Option<PathBuf>,
}

/// Everything the report is assembled from.
#[derive(Clone, Debug)]
pub struct ReportInputs<'a> {
    pub baseline: &'a Path,
    pub current: &'a Path,
    pub summary: DiffSummary,
    /// Shared dimensions after any resize.
    pub size: (u32, u32),
    /// Current raster dimensions as loaded.
    pub current_size: (u32, u32),
    pub resized: bool,
    pub metric: DiffMetric,
    pub regions: Vec<ChangeRegion>,
    pub artifacts: WrittenArtifacts,
}

/// Result of comparing one image pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub diff_image: Option<PathBuf>,
    pub annotated_image: Option<PathBuf>,
    pub annotate_spec: Option<PathBuf>,
    /// Share of pixels with non-zero magnitude, in percent.
    pub percent_changed: f64,
    /// Mean magnitude relative to the maximum, in percent.
    pub avg_diff_percent: f64,
    pub size: Size,
    pub current_size: Size,
    pub resized: bool,
    pub metric: DiffMetric,
    /// Regions in rank order.
    pub change_regions: Vec<ChangeRegion>,
    pub change_region_count: usize,
}

/// Builds the report.
pub fn assemble_report(inputs: ReportInputs<'_>) -> Report {
    let change_region_count = inputs.regions.len();
    Report {
        baseline: inputs.baseline.to_path_buf(),
        current: inputs.current.to_path_buf(),
        diff_image: inputs.artifacts.diff_image,
        annotated_image: inputs.artifacts.annotated_image,
        annotate_spec: inputs.artifacts.annotate_spec,
        percent_changed: round_to(inputs.summary.percent_changed(), PERCENT_PRECISION),
        avg_diff_percent: round_to(inputs.summary.avg_diff_percent(), PERCENT_PRECISION),
        size: inputs.size.into(),
        current_size: inputs.current_size.into(),
        resized: inputs.resized,
        metric: inputs.metric,
        change_regions: inputs.regions,
        change_region_count,
    }
}

impl Report {
    /// Single-line JSON, as printed on stdout.
    pub fn to_compact_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Baseline: {}", self.baseline.display())?;
        writeln!(f, "Current:  {}", self.current.display())?;
        write!(f, "Size:     {}x{}", self.size.width, self.size.height)?;
        if self.resized {
            write!(
                f,
                " (resized from {}x{})",
                self.current_size.width, self.current_size.height
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Changed:  {}% of pixels, average magnitude {}%",
            self.percent_changed, self.avg_diff_percent
        )?;

        writeln!(f)?;
        writeln!(f, "Regions ({}):", self.change_region_count)?;
        if self.change_regions.is_empty() {
            writeln!(f, "  - (none)")?;
        }
        for r in &self.change_regions {
            writeln!(
                f,
                "  - {}: {}x{} at ({}, {}), {} px, coverage {}",
                r.id, r.w, r.h, r.x, r.y, r.pixels, r.coverage
            )?;
        }

        let artifacts = [
            ("Diff image", &self.diff_image),
            ("Annotated", &self.annotated_image),
            ("Spec", &self.annotate_spec),
        ];
        for (label, path) in artifacts {
            if let Some(path) = path {
                writeln!(f, "{label}: {}", path.display())?;
            }
        }
        Ok(())
    }
}
