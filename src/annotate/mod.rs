//! Annotation documents for an external renderer.
//!
//! Each ranked region becomes a `rect` entry at its padded box followed by a
//! `text` entry anchored to that rect, so document order mirrors rank order.

mod io_json;
mod model;

pub use io_json::{from_spec_slice, from_spec_str, read_spec, to_spec_string, write_spec};
pub use model::{
    AnchorPos, AnchorRef, AnchorTarget, Annotation, AnnotationSpec, ArrowAnnotation, Measure,
    RectAnnotation, SpecDefaults, SpotlightAnnotation, TextAnnotation, NEAREST,
};

use crate::region::ChangeRegion;

/// Stroke color of region rectangles.
pub const HIGHLIGHT_COLOR: &str = "#FF453A";
/// Stroke width of region rectangles, in pixels.
pub const HIGHLIGHT_WIDTH: u32 = 3;

pub const LABEL_COLOR: &str = "#FFFFFF";
pub const LABEL_BG: &str = "rgba(255,69,58,0.78)";
pub const LABEL_INTENT: &str = "change-label";
pub const LABEL_ACTION: &str = "review-diff";
/// Label offset from the rect's top-left corner, `[dx, dy]`.
pub const LABEL_OFFSET: [i32; 2] = [0, -18];

/// Short ordinal label for the region at 1-based `rank`.
pub fn region_label(rank: u32) -> String {
    format!("Δ{rank}")
}

/// Builds the annotation document for ranked regions.
///
/// An empty slice yields an empty annotation list with the standard defaults.
pub fn build_annotation_spec(regions: &[ChangeRegion]) -> AnnotationSpec {
    let mut annotations = Vec::with_capacity(regions.len() * 2);

    for region in regions {
        let id = region.id.to_string();

        annotations.push(Annotation::Rect(RectAnnotation {
            id: Some(id.clone()),
            x: region.x.into(),
            y: region.y.into(),
            w: region.w.into(),
            h: region.h.into(),
            color: Some(HIGHLIGHT_COLOR.to_string()),
            width: Some(HIGHLIGHT_WIDTH),
            intent: Some(region.intent.clone()),
            action: Some(region.action.clone()),
        }));

        annotations.push(Annotation::Text(TextAnnotation {
            id: None,
            text: region_label(region.id.rank()),
            x: None,
            y: None,
            anchor: Some(AnchorRef::Id(id)),
            anchor_pos: Some(AnchorPos::TopLeft),
            anchor_offset: Some([LABEL_OFFSET[0].into(), LABEL_OFFSET[1].into()]),
            color: Some(LABEL_COLOR.to_string()),
            text_bg: Some(LABEL_BG.to_string()),
            intent: Some(LABEL_INTENT.to_string()),
            action: Some(LABEL_ACTION.to_string()),
        }));
    }

    AnnotationSpec {
        defaults: SpecDefaults::default(),
        annotations,
    }
}
