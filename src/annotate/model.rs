//! The declarative overlay document consumed by annotation renderers.
//!
//! A document is a `defaults` object plus an ordered list of annotations.
//! Annotations are tagged by `"type"`; this crate only emits `rect` and `text`
//! entries, but the type also models `spotlight` and `arrow` so documents
//! produced elsewhere can be read back and checked.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A complete annotation document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSpec {
    /// Rendering-wide options, interpreted by the renderer only.
    #[serde(default)]
    pub defaults: SpecDefaults,

    /// Entries in paint order.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Rendering hints applied to every annotation.
///
/// Missing keys take the same values as [`SpecDefaults::default`], whether
/// the whole `defaults` object is absent or only some of its keys are.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecDefaults {
    #[serde(default = "default_true")]
    pub auto_scale: bool,

    #[serde(default = "default_true")]
    pub outline: bool,

    /// Default background behind text labels.
    #[serde(default = "default_text_bg", skip_serializing_if = "Option::is_none")]
    pub text_bg: Option<String>,

    /// Renderer options this crate does not interpret (units, auto_fit, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SpecDefaults {
    fn default() -> Self {
        Self {
            auto_scale: true,
            outline: true,
            text_bg: default_text_bg(),
            extra: Map::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_text_bg() -> Option<String> {
    Some("rgba(0,0,0,0.6)".to_string())
}

/// A coordinate or length as written in a document.
///
/// Pixel integers are what this crate emits; renderers also accept plain
/// floats and strings such as `"10%"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measure {
    Px(i64),
    Float(f64),
    Expr(String),
}

impl From<u32> for Measure {
    fn from(v: u32) -> Self {
        Measure::Px(i64::from(v))
    }
}

impl From<i32> for Measure {
    fn from(v: i32) -> Self {
        Measure::Px(i64::from(v))
    }
}

/// Keyword that anchors to whichever entry lies closest.
pub const NEAREST: &str = "nearest";

/// Reference from one annotation to another.
///
/// Documents spell anchors several ways: a string id, a list index, `true`
/// or `"nearest"` for the closest entry, or an object carrying any of those
/// plus a position and offset. `false`, `null` and blank strings mean the
/// field is unset.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorRef {
    /// Whichever entry is closest to the anchored one.
    Nearest,
    /// The `id` of the target annotation.
    Id(String),
    /// Position of the target in the annotation list.
    Index(usize),
    /// The object form.
    Target(AnchorTarget),
}

/// Object form of an anchor. `id` wins over `index`, which wins over
/// `nearest`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nearest: bool,
    /// Restricts `nearest` to entries of this type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<AnchorPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<[Measure; 2]>,
}

impl Serialize for AnchorRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AnchorRef::Nearest => serializer.serialize_str(NEAREST),
            AnchorRef::Id(id) => serializer.serialize_str(id),
            AnchorRef::Index(idx) => serializer.serialize_u64(*idx as u64),
            AnchorRef::Target(target) => target.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnchor {
    Flag(bool),
    Index(usize),
    Name(String),
    Target(AnchorTarget),
}

impl RawAnchor {
    fn into_anchor(self) -> Option<AnchorRef> {
        match self {
            RawAnchor::Flag(true) => Some(AnchorRef::Nearest),
            RawAnchor::Flag(false) => None,
            RawAnchor::Index(idx) => Some(AnchorRef::Index(idx)),
            RawAnchor::Name(name) => {
                let name = name.trim();
                if name.is_empty() {
                    None
                } else if name.eq_ignore_ascii_case(NEAREST) {
                    Some(AnchorRef::Nearest)
                } else {
                    Some(AnchorRef::Id(name.to_string()))
                }
            }
            RawAnchor::Target(target) => Some(AnchorRef::Target(target)),
        }
    }
}

fn deserialize_anchor<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AnchorRef>, D::Error> {
    Ok(Option::<RawAnchor>::deserialize(deserializer)?.and_then(RawAnchor::into_anchor))
}

/// Point on the anchor target's box that an anchored entry attaches to.
///
/// Read case-insensitively with `-` or `_` separators. Unrecognized names
/// fall back to [`AnchorPos::Center`], the way renderers treat them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPos {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl AnchorPos {
    /// Parses a position name, normalizing case and separators.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_left" => AnchorPos::TopLeft,
            "top" => AnchorPos::Top,
            "top_right" => AnchorPos::TopRight,
            "left" => AnchorPos::Left,
            "right" => AnchorPos::Right,
            "bottom_left" => AnchorPos::BottomLeft,
            "bottom" => AnchorPos::Bottom,
            "bottom_right" => AnchorPos::BottomRight,
            _ => AnchorPos::Center,
        }
    }
}

impl<'de> Deserialize<'de> for AnchorPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AnchorPos::parse_lenient(&raw))
    }
}

/// One entry of the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Rect(RectAnnotation),
    Text(TextAnnotation),
    #[serde(alias = "focus", alias = "dim")]
    Spotlight(SpotlightAnnotation),
    Arrow(ArrowAnnotation),
}

impl Annotation {
    /// The entry's own identifier, if it has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Annotation::Rect(a) => a.id.as_deref(),
            Annotation::Text(a) => a.id.as_deref(),
            Annotation::Spotlight(a) => a.id.as_deref(),
            Annotation::Arrow(a) => a.id.as_deref(),
        }
    }

    /// Every annotation this entry points at.
    pub fn anchors(&self) -> Vec<&AnchorRef> {
        match self {
            Annotation::Text(a) => a.anchor.iter().collect(),
            Annotation::Arrow(a) => a.from.iter().chain(a.to.iter()).collect(),
            Annotation::Rect(_) | Annotation::Spotlight(_) => Vec::new(),
        }
    }

    /// The `"type"` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Annotation::Rect(_) => "rect",
            Annotation::Text(_) => "text",
            Annotation::Spotlight(_) => "spotlight",
            Annotation::Arrow(_) => "arrow",
        }
    }
}

/// A stroked rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: Measure,
    pub y: Measure,
    pub w: Measure,
    pub h: Measure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Stroke width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// A text label, either positioned absolutely or anchored to another entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Measure>,
    #[serde(
        default,
        deserialize_with = "deserialize_anchor",
        skip_serializing_if = "Option::is_none"
    )]
    pub anchor: Option<AnchorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_pos: Option<AnchorPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_offset: Option<[Measure; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// A box left at full brightness while the rest of the image is dimmed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpotlightAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: Measure,
    pub y: Measure,
    pub w: Measure,
    pub h: Measure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// An arrow between two points or two anchored entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArrowAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_anchor",
        skip_serializing_if = "Option::is_none"
    )]
    pub from: Option<AnchorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_pos: Option<AnchorPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_offset: Option<[Measure; 2]>,
    #[serde(
        default,
        deserialize_with = "deserialize_anchor",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<AnchorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_pos: Option<AnchorPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_offset: Option<[Measure; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl AnnotationSpec {
    /// Anchors that name an id no entry defines, or an out-of-range index.
    ///
    /// A `nearest` anchor resolves while the document has another entry to
    /// attach to. The object form tries its id, then its index, then falls
    /// back to nearest, among entries of its `type` if one is given.
    pub fn unresolved_anchors(&self) -> Vec<&AnchorRef> {
        self.annotations
            .iter()
            .flat_map(Annotation::anchors)
            .filter(|anchor| !self.resolves(anchor))
            .collect()
    }

    fn resolves(&self, anchor: &AnchorRef) -> bool {
        let has_id = |id: &str| self.annotations.iter().any(|a| a.id() == Some(id.trim()));
        match anchor {
            AnchorRef::Nearest => self.annotations.len() > 1,
            AnchorRef::Id(id) => has_id(id),
            AnchorRef::Index(idx) => *idx < self.annotations.len(),
            AnchorRef::Target(target) => {
                let candidates: Vec<(usize, &Annotation)> = self
                    .annotations
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| {
                        target
                            .kind
                            .as_deref()
                            .map_or(true, |kind| a.kind().eq_ignore_ascii_case(kind.trim()))
                    })
                    .collect();
                let by_id = target.id.as_deref().is_some_and(|id| {
                    candidates.iter().any(|(_, a)| a.id() == Some(id.trim()))
                });
                let by_index = target
                    .index
                    .is_some_and(|idx| candidates.iter().any(|(i, _)| *i == idx));
                let wants_nearest = target.nearest
                    || (target.id.is_none() && target.index.is_none() && target.kind.is_none());
                by_id || by_index || (wants_nearest && !candidates.is_empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_untagged_forms() {
        let m: Measure = serde_json::from_str("18").expect("int");
        assert_eq!(m, Measure::Px(18));
        let m: Measure = serde_json::from_str("0.5").expect("float");
        assert_eq!(m, Measure::Float(0.5));
        let m: Measure = serde_json::from_str("\"10%\"").expect("expr");
        assert_eq!(m, Measure::Expr("10%".into()));
        assert_eq!(serde_json::to_string(&Measure::from(-18)).expect("ser"), "-18");
    }

    #[test]
    fn reads_foreign_document_with_all_types() {
        let json = r##"{
            "defaults": {"units": "px", "auto_scale": true, "auto_fit": true},
            "annotations": [
                {"type": "rect", "id": "cta", "x": "10%", "y": "20%", "w": "35%", "h": "12%",
                 "intent": "target", "action": "inspect", "color": "#FF3B30"},
                {"type": "arrow", "from": "cta", "to": 0, "color": "#0A84FF"},
                {"type": "text", "x": 130, "y": 90, "text": "Add button", "anchor": "cta"},
                {"type": "spotlight", "x": 110, "y": 70, "w": 190, "h": 60, "radius": 10}
            ]
        }"##;
        let spec: AnnotationSpec = serde_json::from_str(json).expect("parse");
        let kinds: Vec<&str> = spec.annotations.iter().map(Annotation::kind).collect();
        assert_eq!(kinds, vec!["rect", "arrow", "text", "spotlight"]);
        assert!(spec.defaults.auto_scale);
        assert!(spec.defaults.outline);
        assert_eq!(spec.defaults.text_bg, SpecDefaults::default().text_bg);
        assert_eq!(spec.defaults.extra.get("units"), Some(&Value::from("px")));
        assert!(spec.unresolved_anchors().is_empty());
        assert_eq!(spec.annotations[1].anchors().len(), 2);
    }

    #[test]
    fn unresolved_anchors_are_reported() {
        let json = r#"{"annotations": [
            {"type": "text", "text": "a", "anchor": "missing"},
            {"type": "arrow", "from": 7}
        ]}"#;
        let spec: AnnotationSpec = serde_json::from_str(json).expect("parse");
        assert_eq!(spec.unresolved_anchors().len(), 2);
        assert_eq!(spec.defaults, SpecDefaults::default());
    }

    #[test]
    fn missing_and_empty_defaults_parse_alike() {
        let missing: AnnotationSpec = serde_json::from_str(r#"{"annotations":[]}"#).expect("parse");
        let empty: AnnotationSpec =
            serde_json::from_str(r#"{"defaults":{},"annotations":[]}"#).expect("parse");
        assert_eq!(missing, empty);
        assert_eq!(empty.defaults, SpecDefaults::default());

        let partial: AnnotationSpec =
            serde_json::from_str(r#"{"defaults":{"outline":false}}"#).expect("parse");
        assert!(!partial.defaults.outline);
        assert!(partial.defaults.auto_scale);
        assert_eq!(partial.defaults.text_bg, SpecDefaults::default().text_bg);
    }

    #[test]
    fn renderer_manifest_is_readable_and_resolved() {
        let json = r##"{
            "defaults": {"units": "px", "auto_scale": true, "outline": true, "auto_fit": true},
            "annotations": [
                {"type": "rect", "x": "10%", "y": "20%", "w": "35%", "h": "12%",
                 "intent": "target", "action": "inspect", "color": "#FF3B30"},
                {"type": "arrow", "from": "cta", "to": "nearest", "color": "#0A84FF"},
                {"type": "text", "x": 130, "y": 90, "text": "Add button", "anchor": "cta"},
                {"type": "spotlight", "x": 110, "y": 70, "w": 190, "h": 60, "radius": 10}
            ]
        }"##;
        let spec: AnnotationSpec = serde_json::from_str(json).expect("parse");
        let Annotation::Arrow(arrow) = &spec.annotations[1] else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.to, Some(AnchorRef::Nearest));
        // Only the two "cta" references dangle: the manifest's rect has no id.
        let unresolved = spec.unresolved_anchors();
        assert_eq!(unresolved.len(), 2);
        assert!(unresolved.iter().all(|a| **a == AnchorRef::Id("cta".into())));
    }

    #[test]
    fn anchor_spellings() {
        let json = r#"{"annotations": [
            {"type": "rect", "id": "box", "x": 0, "y": 0, "w": 4, "h": 4},
            {"type": "text", "text": "a", "anchor": true},
            {"type": "text", "text": "b", "anchor": " NEAREST "},
            {"type": "text", "text": "c", "anchor": false},
            {"type": "text", "text": "d", "anchor": ""},
            {"type": "text", "text": "e", "anchor": {"id": "box", "pos": "Top-Left", "offset": [2, -4]}},
            {"type": "text", "text": "f", "anchor": {"nearest": true, "type": "rect"}},
            {"type": "arrow", "from": {"index": 0}, "to": 0, "to_pos": "bottom-right"}
        ]}"#;
        let spec: AnnotationSpec = serde_json::from_str(json).expect("parse");
        let anchor = |i: usize| match &spec.annotations[i] {
            Annotation::Text(t) => t.anchor.clone(),
            other => panic!("expected text, got {}", other.kind()),
        };

        assert_eq!(anchor(1), Some(AnchorRef::Nearest));
        assert_eq!(anchor(2), Some(AnchorRef::Nearest));
        assert_eq!(anchor(3), None);
        assert_eq!(anchor(4), None);
        let Some(AnchorRef::Target(target)) = anchor(5) else {
            panic!("expected object anchor");
        };
        assert_eq!(target.id.as_deref(), Some("box"));
        assert_eq!(target.pos, Some(AnchorPos::TopLeft));
        assert_eq!(target.offset, Some([Measure::Px(2), Measure::Px(-4)]));

        let Annotation::Arrow(arrow) = &spec.annotations[7] else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.to_pos, Some(AnchorPos::BottomRight));
        assert!(spec.unresolved_anchors().is_empty());
    }

    #[test]
    fn object_anchor_restricted_by_type() {
        let json = r#"{"annotations": [
            {"type": "rect", "id": "box", "x": 0, "y": 0, "w": 4, "h": 4},
            {"type": "text", "text": "a", "anchor": {"type": "arrow", "nearest": true}},
            {"type": "text", "text": "b", "anchor": {"type": "rect", "id": "nope", "index": 0}}
        ]}"#;
        let spec: AnnotationSpec = serde_json::from_str(json).expect("parse");
        let unresolved = spec.unresolved_anchors();
        assert_eq!(unresolved.len(), 1);
        assert!(matches!(unresolved[0], AnchorRef::Target(t) if t.kind.as_deref() == Some("arrow")));
    }

    #[test]
    fn anchor_pos_is_lenient() {
        for raw in ["top_left", "top-left", "TOP-LEFT", " Top_Left "] {
            assert_eq!(AnchorPos::parse_lenient(raw), AnchorPos::TopLeft, "{raw}");
        }
        assert_eq!(AnchorPos::parse_lenient("middle"), AnchorPos::Center);
        let pos: AnchorPos = serde_json::from_str(r#""bottom-right""#).expect("parse");
        assert_eq!(serde_json::to_string(&pos).expect("ser"), r#""bottom_right""#);
    }

    #[test]
    fn spotlight_aliases() {
        for kind in ["focus", "dim", "spotlight"] {
            let json = format!(
                r#"{{"annotations": [{{"type": "{kind}", "x": 1, "y": 2, "w": 3, "h": 4}}]}}"#
            );
            let spec: AnnotationSpec = serde_json::from_str(&json).expect("parse");
            assert_eq!(spec.annotations[0].kind(), "spotlight");
        }
    }

    #[test]
    fn anchors_serialize_in_their_short_forms() {
        assert_eq!(serde_json::to_string(&AnchorRef::Nearest).expect("ser"), r#""nearest""#);
        assert_eq!(serde_json::to_string(&AnchorRef::Index(3)).expect("ser"), "3");
        let target = AnchorRef::Target(AnchorTarget {
            id: Some("box".into()),
            ..AnchorTarget::default()
        });
        assert_eq!(serde_json::to_string(&target).expect("ser"), r#"{"id":"box"}"#);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"annotations": [{"type": "ellipse", "x": 1}]}"#;
        assert!(serde_json::from_str::<AnnotationSpec>(json).is_err());
    }
}
