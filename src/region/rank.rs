//! Region ranking, capping and identifier assignment.

use tracing::debug;

use super::ids::RegionId;
use super::model::{ChangeRegion, RawRegion, REGION_ACTION, REGION_INTENT};
use crate::geom::{round_to, BoxXYWH, Pixel};

/// Decimal places kept for coverage.
pub const COVERAGE_PRECISION: u32 = 4;

/// Orders regions by pixel count, largest first, and keeps at most
/// `max_regions` of them (0 keeps all).
///
/// Equal pixel counts keep their row-major discovery order. Identifiers
/// `change-1, change-2, ...` follow the final order, and relative boxes are
/// computed against `width`×`height`.
pub fn rank_regions(
    mut raw: Vec<RawRegion>,
    width: u32,
    height: u32,
    max_regions: usize,
) -> Vec<ChangeRegion> {
    let found = raw.len();
    raw.sort_by(|a, b| b.pixels.cmp(&a.pixels).then(a.discovery.cmp(&b.discovery)));
    if max_regions > 0 {
        raw.truncate(max_regions);
    }

    debug!(found, kept = raw.len(), max_regions, "ranked change regions");

    raw.into_iter()
        .enumerate()
        .map(|(idx, r)| {
            let rel = BoxXYWH::<Pixel>::new(
                f64::from(r.x),
                f64::from(r.y),
                f64::from(r.w),
                f64::from(r.h),
            )
            .to_normalized(width, height);

            ChangeRegion {
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
                x2: r.x + r.w,
                y2: r.y + r.h,
                pixels: r.pixels,
                area: r.area,
                coverage: round_to(r.coverage, COVERAGE_PRECISION),
                intent: REGION_INTENT.to_string(),
                action: REGION_ACTION.to_string(),
                id: RegionId::new(idx as u32 + 1),
                rel,
                tight: r.tight,
            }
        })
        .collect()
}
