//! Axis-aligned boxes in XYWH format.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use super::{round_to, Normalized, Pixel, REL_PRECISION};

/// An axis-aligned box in XYWH format, where (x, y) is the top-left corner.
///
/// The `TSpace` parameter should be either [`Pixel`] or [`Normalized`], so a
/// relative box cannot be handed to code that expects pixels.
#[derive(Clone, Copy, PartialEq)]
pub struct BoxXYWH<TSpace> {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BoxXYWH<TSpace> {
    /// Creates a new box from its top-left corner and size.
    #[inline]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            _space: PhantomData,
        }
    }
}

impl BoxXYWH<Pixel> {
    /// Converts pixel geometry to relative geometry.
    ///
    /// Each of x/w is divided by `image_width` and y/h by `image_height`,
    /// rounded to [`REL_PRECISION`] places. A zero dimension yields 0 for the
    /// values divided by it.
    pub fn to_normalized(&self, image_width: u32, image_height: u32) -> BoxXYWH<Normalized> {
        let fx = |v: f64| ratio(v, image_width);
        let fy = |v: f64| ratio(v, image_height);
        BoxXYWH::new(fx(self.x), fy(self.y), fx(self.w), fy(self.h))
    }
}

fn ratio(value: f64, span: u32) -> f64 {
    if span == 0 {
        0.0
    } else {
        round_to(value / f64::from(span), REL_PRECISION)
    }
}

impl<TSpace> std::fmt::Debug for BoxXYWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxXYWH")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<TSpace> Default for BoxXYWH<TSpace> {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

// Custom serde implementation to avoid TSpace: Serialize/Deserialize bounds
impl<TSpace> Serialize for BoxXYWH<TSpace> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("BoxXYWH", 4)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.serialize_field("w", &self.w)?;
        state.serialize_field("h", &self.h)?;
        state.end()
    }
}

impl<'de, TSpace> Deserialize<'de> for BoxXYWH<TSpace> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct BoxData {
            x: f64,
            y: f64,
            w: f64,
            h: f64,
        }
        let data = BoxData::deserialize(deserializer)?;
        Ok(BoxXYWH::new(data.x, data.y, data.w, data.h))
    }
}
