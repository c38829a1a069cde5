//! Geometry shared by the region and annotation modules.

mod rect;
mod space;

pub use rect::BoxXYWH;
pub use space::{Normalized, Pixel};

/// Decimal places kept for relative coordinates.
pub const REL_PRECISION: u32 = 6;

/// Rounds `value` to `digits` decimal places.
///
/// Used wherever output must stay stable and diffable across runs.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_keeps_requested_digits() {
        assert_eq!(round_to(0.123_456_789, 6), 0.123_457);
        assert_eq!(round_to(12.345_6, 3), 12.346);
        assert_eq!(round_to(1.0 / 3.0, 4), 0.3333);
        assert_eq!(round_to(0.0, 6), 0.0);
    }
}
