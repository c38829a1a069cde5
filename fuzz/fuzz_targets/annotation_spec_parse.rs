//! Fuzz target for annotation document parsing.
//!
//! Arbitrary bytes go to the JSON parser; any document that parses is also
//! checked for anchors and re-encoded.

#![no_main]

use libfuzzer_sys::fuzz_target;
use shotdiff::annotate::{from_spec_slice, to_spec_string};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(spec) = from_spec_slice(data) {
        let _ = spec.unresolved_anchors();
        let _ = to_spec_string(&spec);
    }
});
