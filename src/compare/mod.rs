//! End-to-end comparison of one image pair.
//!
//! [`compare_rasters`] runs the in-memory stages on two decoded rasters.
//! [`compare_images`] adds loading and artifact writes around it. All inputs
//! are loaded and checked before the first artifact is written, so an input
//! error never leaves partial output behind.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{info, instrument};

use crate::annotate::{self, AnnotationSpec};
use crate::artifact;
use crate::diff::{self, DiffMetric, DiffSummary, DifferenceGrid};
use crate::error::ShotdiffError;
use crate::overlay;
use crate::raster;
use crate::region::{self, ChangeRegion, ExtractOptions, RegionOptions};
use crate::report::{self, Report, ReportInputs, WrittenArtifacts};

/// Tuning for one comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareOptions {
    /// Magnitude a pixel must exceed to count as changed.
    pub threshold: u8,
    /// Clusters with fewer pixels are discarded.
    pub min_cluster_pixels: u32,
    /// Margin around each region's tight bounds.
    pub pad: u32,
    /// Cap on reported regions; 0 means unbounded.
    pub max_regions: usize,
    pub metric: DiffMetric,
    /// Resample the current raster to the baseline's size on mismatch.
    pub resize: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        let region = RegionOptions::default();
        Self {
            threshold: region.extract.threshold,
            min_cluster_pixels: region.extract.min_cluster_pixels,
            pad: region.extract.pad,
            max_regions: region.max_regions,
            metric: DiffMetric::default(),
            resize: false,
        }
    }
}

impl CompareOptions {
    /// Builds options from unchecked integers, clamping each into range.
    ///
    /// Out-of-range values are normalized rather than rejected: threshold to
    /// 0..=255, min cluster pixels to at least 1, pad and max regions to at
    /// least 0.
    pub fn clamped(threshold: i64, min_cluster_pixels: i64, pad: i64, max_regions: i64) -> Self {
        Self {
            threshold: threshold.clamp(0, i64::from(u8::MAX)) as u8,
            min_cluster_pixels: min_cluster_pixels.clamp(1, i64::from(u32::MAX)) as u32,
            pad: pad.clamp(0, i64::from(u32::MAX)) as u32,
            max_regions: usize::try_from(max_regions.max(0)).unwrap_or(usize::MAX),
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, metric: DiffMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_resize(mut self, resize: bool) -> Self {
        self.resize = resize;
        self
    }

    /// The region extraction and ranking part of these options.
    pub fn region_options(&self) -> RegionOptions {
        RegionOptions {
            extract: ExtractOptions {
                threshold: self.threshold,
                min_cluster_pixels: self.min_cluster_pixels,
                pad: self.pad,
            },
            max_regions: self.max_regions,
        }
    }
}

/// Where to write optional artifacts. `None` skips the artifact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Heat-only overlay image.
    pub diff_out: Option<PathBuf>,
    /// Heat overlay with region boxes and labels.
    pub annotated_out: Option<PathBuf>,
    /// Annotation document.
    pub annotate_spec_out: Option<PathBuf>,
    /// Pretty-printed copy of the report.
    pub json_out: Option<PathBuf>,
}

/// In-memory result of comparing two rasters.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub grid: DifferenceGrid,
    pub summary: DiffSummary,
    pub regions: Vec<ChangeRegion>,
    pub spec: AnnotationSpec,
}

/// Diffs two equally sized rasters and derives regions and the annotation
/// document. Touches no files.
///
/// # Errors
/// Returns [`ShotdiffError::DimensionMismatch`] if the rasters differ in size.
pub fn compare_rasters(
    baseline: &RgbaImage,
    current: &RgbaImage,
    opts: &CompareOptions,
) -> Result<Comparison, ShotdiffError> {
    let (grid, summary) = diff::compute_difference(baseline, current, opts.metric)?;
    let regions = region::detect_regions(&grid, &opts.region_options());
    let spec = annotate::build_annotation_spec(&regions);

    Ok(Comparison {
        grid,
        summary,
        regions,
        spec,
    })
}

/// Loads, compares and writes the requested artifacts for one image pair.
///
/// # Errors
/// Returns an input error if either file is missing or undecodable, or if the
/// sizes differ without `resize`; no artifact is written in that case. Returns
/// an output error if an artifact cannot be encoded or written.
#[instrument(skip_all, fields(baseline = %baseline.display(), current = %current.display()))]
pub fn compare_images(
    baseline: &Path,
    current: &Path,
    opts: &CompareOptions,
    artifacts: &ArtifactPaths,
) -> Result<Report, ShotdiffError> {
    let pair = raster::load_pair(baseline, current, opts.resize)?;
    let comparison = compare_rasters(&pair.baseline, &pair.current, opts)?;

    let mut written = WrittenArtifacts::default();

    if let Some(path) = &artifacts.diff_out {
        let image = overlay::render_heat_overlay(&pair.current, &comparison.grid);
        written.diff_image = Some(artifact::write_image(path, &image)?);
    }

    if let Some(path) = &artifacts.annotate_spec_out {
        annotate::write_spec(path, &comparison.spec)?;
        written.annotate_spec = Some(artifact::absolute(path));
    }

    if let Some(path) = &artifacts.annotated_out {
        let image =
            overlay::render_annotated_overlay(&pair.current, &comparison.grid, &comparison.regions);
        written.annotated_image = Some(artifact::write_image(path, &image)?);
    }

    let report = report::assemble_report(ReportInputs {
        baseline: &artifact::absolute(baseline),
        current: &artifact::absolute(current),
        summary: comparison.summary,
        size: pair.dimensions(),
        current_size: pair.current_size,
        resized: pair.resized,
        metric: opts.metric,
        regions: comparison.regions,
        artifacts: written,
    });

    if let Some(path) = &artifacts.json_out {
        artifact::write_json(path, &report)?;
    }

    info!(
        percent_changed = report.percent_changed,
        regions = report.change_region_count,
        resized = report.resized,
        "comparison complete"
    );
    Ok(report)
}
