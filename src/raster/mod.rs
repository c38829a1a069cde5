//! Raster loading and size alignment.
//!
//! Both inputs are decoded to straight-alpha RGBA8 regardless of the source
//! format. When the two captures differ in size the current raster can be
//! resampled to the baseline's size; otherwise the pair is rejected before any
//! artifact is produced.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::{debug, info};

use crate::error::ShotdiffError;

/// Which side of the comparison a raster belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Baseline,
    Current,
}

/// Two rasters of identical dimensions, ready for differencing.
#[derive(Clone, Debug)]
pub struct RasterPair {
    pub baseline: RgbaImage,
    pub current: RgbaImage,
    /// Dimensions of the current raster as loaded, before any resize.
    pub current_size: (u32, u32),
    /// True if the current raster was resampled to the baseline's size.
    pub resized: bool,
}

impl RasterPair {
    /// Dimensions shared by both rasters.
    pub fn dimensions(&self) -> (u32, u32) {
        self.baseline.dimensions()
    }
}

/// Loads the baseline and current rasters from disk.
///
/// Missing files are reported per side. Without `resize`, a size mismatch is
/// detected from the file headers where possible so that large mismatched
/// captures fail before being decoded.
///
/// # Errors
/// Returns an error if either file is missing or cannot be decoded, or if
/// the sizes differ and `resize` is false.
pub fn load_pair(baseline: &Path, current: &Path, resize: bool) -> Result<RasterPair, ShotdiffError> {
    ensure_exists(baseline, Side::Baseline)?;
    ensure_exists(current, Side::Current)?;

    if !resize {
        if let (Some(b), Some(c)) = (probe_dimensions(baseline), probe_dimensions(current)) {
            if b != c {
                return Err(mismatch(b, c));
            }
        }
    }

    let baseline_img = load_rgba(baseline)?;
    let current_img = load_rgba(current)?;
    align_pair(baseline_img, current_img, resize)
}

/// Decodes one raster file to RGBA8.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, ShotdiffError> {
    let img = image::open(path).map_err(|source| ShotdiffError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    debug!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        "decoded raster"
    );
    Ok(rgba)
}

/// Reads image dimensions from the file header without decoding pixels.
///
/// Returns `None` when the header cannot be read; callers fall back to the
/// dimensions of the decoded raster.
pub fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    let size = imagesize::size(path).ok()?;
    let width: u32 = size.width.try_into().ok()?;
    let height: u32 = size.height.try_into().ok()?;
    Some((width, height))
}

/// Brings two decoded rasters to a common size.
///
/// The current raster is resampled with a Lanczos3 filter to the baseline's
/// dimensions when they differ and `resize` is true.
pub fn align_pair(
    baseline: RgbaImage,
    current: RgbaImage,
    resize: bool,
) -> Result<RasterPair, ShotdiffError> {
    let base_dims = baseline.dimensions();
    let current_size = current.dimensions();

    if base_dims == current_size {
        return Ok(RasterPair {
            baseline,
            current,
            current_size,
            resized: false,
        });
    }

    if !resize {
        return Err(mismatch(base_dims, current_size));
    }

    info!(
        from_width = current_size.0,
        from_height = current_size.1,
        to_width = base_dims.0,
        to_height = base_dims.1,
        "resizing current raster to baseline size"
    );
    let current = imageops::resize(&current, base_dims.0, base_dims.1, FilterType::Lanczos3);

    Ok(RasterPair {
        baseline,
        current,
        current_size,
        resized: true,
    })
}

fn ensure_exists(path: &Path, side: Side) -> Result<(), ShotdiffError> {
    if path.exists() {
        return Ok(());
    }
    Err(match side {
        Side::Baseline => ShotdiffError::BaselineNotFound(path.to_path_buf()),
        Side::Current => ShotdiffError::CurrentNotFound(path.to_path_buf()),
    })
}

fn mismatch(baseline: (u32, u32), current: (u32, u32)) -> ShotdiffError {
    ShotdiffError::DimensionMismatch {
        baseline_width: baseline.0,
        baseline_height: baseline.1,
        current_width: current.0,
        current_height: current.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))
    }

    #[test]
    fn align_same_size_is_untouched() {
        let pair = align_pair(solid(10, 8, 0), solid(10, 8, 255), false).expect("align");
        assert!(!pair.resized);
        assert_eq!(pair.dimensions(), (10, 8));
        assert_eq!(pair.current_size, (10, 8));
        assert_eq!(pair.current.get_pixel(3, 3)[0], 255);
    }

    #[test]
    fn align_mismatch_without_resize_fails() {
        let err = align_pair(solid(10, 8, 0), solid(12, 8, 0), false).unwrap_err();
        assert!(matches!(
            err,
            ShotdiffError::DimensionMismatch {
                baseline_width: 10,
                current_width: 12,
                ..
            }
        ));
    }

    #[test]
    fn align_mismatch_with_resize_matches_baseline() {
        let pair = align_pair(solid(10, 8, 0), solid(20, 16, 200), true).expect("align");
        assert!(pair.resized);
        assert_eq!(pair.current.dimensions(), (10, 8));
        assert_eq!(pair.current_size, (20, 16));
        // Uniform input stays uniform through the resampling filter.
        assert_eq!(pair.current.get_pixel(5, 4)[0], 200);
    }

    #[test]
    fn load_pair_reports_missing_side() {
        let dir = tempfile::tempdir().expect("tempdir");
        let present = dir.path().join("present.png");
        solid(4, 4, 10).save(&present).expect("save");
        let missing = dir.path().join("missing.png");

        let err = load_pair(&missing, &present, false).unwrap_err();
        assert!(matches!(err, ShotdiffError::BaselineNotFound(_)));

        let err = load_pair(&present, &missing, false).unwrap_err();
        assert!(matches!(err, ShotdiffError::CurrentNotFound(_)));
    }

    #[test]
    fn probe_reads_png_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("probe.png");
        solid(33, 21, 0).save(&path).expect("save");
        assert_eq!(probe_dimensions(&path), Some((33, 21)));
        assert_eq!(probe_dimensions(&dir.path().join("nope.png")), None);
    }

    #[test]
    fn load_pair_detects_mismatch_from_headers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        solid(8, 8, 0).save(&a).expect("save");
        solid(9, 8, 0).save(&b).expect("save");
        let err = load_pair(&a, &b, false).unwrap_err();
        assert!(matches!(err, ShotdiffError::DimensionMismatch { .. }));

        let pair = load_pair(&a, &b, true).expect("resize allowed");
        assert!(pair.resized);
        assert_eq!(pair.dimensions(), (8, 8));
    }
}
