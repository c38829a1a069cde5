#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use shotdiff::diff::DifferenceGrid;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Grids up to `max_w` x `max_h` with sparse noise plus a few solid blocks,
/// so both tiny and sizeable clusters show up.
pub fn arb_grid(max_w: u32, max_h: u32) -> BoxedStrategy<DifferenceGrid> {
    (1..=max_w, 1..=max_h)
        .prop_flat_map(|(w, h)| {
            let cells = (w * h) as usize;
            let noise = proptest::collection::vec(
                prop_oneof![6 => Just(0u8), 1 => any::<u8>()],
                cells,
            );
            let blocks = proptest::collection::vec((0..w, 0..h, 1..=w, 1..=h, 1u8..=255), 0..4);
            (Just(w), Just(h), noise, blocks)
        })
        .prop_map(|(w, h, mut data, blocks)| {
            for (x0, y0, bw, bh, value) in blocks {
                for y in y0..(y0 + bh).min(h) {
                    for x in x0..(x0 + bw).min(w) {
                        data[(y * w + x) as usize] = value;
                    }
                }
            }
            DifferenceGrid::from_raw(w, h, data).expect("grid size")
        })
        .boxed()
}

/// Rounds half away from zero, matching the relative-coordinate round trip.
pub fn round_px(v: f64) -> i64 {
    v.round() as i64
}
