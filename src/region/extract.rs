//! Thresholded connected-component extraction.
//!
//! The grid is thresholded into an active mask, then scanned in row-major
//! order. Every unvisited active cell seeds a 4-connected flood fill driven
//! by an explicit work-list, so large uniform regions cannot exhaust the call
//! stack. The mask and visited flags live only for the duration of one call.

use tracing::debug;

use super::model::{RawRegion, TightBounds};
use crate::diff::DifferenceGrid;

/// Parameters for region extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// A cell is active when its magnitude is strictly above this.
    pub threshold: u8,
    /// Clusters with fewer pixels are discarded. Values below 1 act as 1.
    pub min_cluster_pixels: u32,
    /// Margin added to each side of the tight bounds before clamping.
    pub pad: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            threshold: 24,
            min_cluster_pixels: 64,
            pad: 2,
        }
    }
}

/// Extracts every cluster that survives the size filter, in discovery order.
pub fn extract_regions(grid: &DifferenceGrid, opts: &ExtractOptions) -> Vec<RawRegion> {
    let (width, height) = grid.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let w = width as usize;
    let active: Vec<bool> = grid.as_raw().iter().map(|&v| v > opts.threshold).collect();
    let mut visited = vec![false; active.len()];
    let mut pending: Vec<usize> = Vec::new();
    let min_pixels = u64::from(opts.min_cluster_pixels.max(1));

    let mut regions = Vec::new();
    let mut clusters = 0usize;

    for start in 0..active.len() {
        if visited[start] || !active[start] {
            continue;
        }
        clusters += 1;

        visited[start] = true;
        pending.push(start);
        let mut bounds = TightBounds::at((start % w) as u32, (start / w) as u32);
        let mut pixels: u64 = 0;

        while let Some(node) = pending.pop() {
            let cx = node % w;
            let cy = node / w;
            pixels += 1;
            bounds.include(cx as u32, cy as u32);

            // left, right, up, down
            if cx > 0 {
                visit(node - 1, &active, &mut visited, &mut pending);
            }
            if cx + 1 < w {
                visit(node + 1, &active, &mut visited, &mut pending);
            }
            if cy > 0 {
                visit(node - w, &active, &mut visited, &mut pending);
            }
            if cy + 1 < height as usize {
                visit(node + w, &active, &mut visited, &mut pending);
            }
        }

        if pixels < min_pixels {
            continue;
        }

        regions.push(padded_region(
            regions.len(),
            bounds,
            pixels,
            opts.pad,
            width,
            height,
        ));
    }

    debug!(
        clusters,
        kept = regions.len(),
        threshold = opts.threshold,
        min_pixels,
        "extracted change clusters"
    );
    regions
}

#[inline]
fn visit(idx: usize, active: &[bool], visited: &mut [bool], pending: &mut Vec<usize>) {
    if active[idx] && !visited[idx] {
        visited[idx] = true;
        pending.push(idx);
    }
}

fn padded_region(
    discovery: usize,
    tight: TightBounds,
    pixels: u64,
    pad: u32,
    width: u32,
    height: u32,
) -> RawRegion {
    let x0 = tight.min_x.saturating_sub(pad);
    let y0 = tight.min_y.saturating_sub(pad);
    let x1 = tight.max_x.saturating_add(pad).min(width - 1);
    let y1 = tight.max_y.saturating_add(pad).min(height - 1);

    let w = x1 - x0 + 1;
    let h = y1 - y0 + 1;
    let area = u64::from(w) * u64::from(h);
    let coverage = if area > 0 {
        pixels as f64 / area as f64
    } else {
        0.0
    };

    RawRegion {
        discovery,
        tight,
        pixels,
        x: x0,
        y: y0,
        w,
        h,
        area,
        coverage,
    }
}
