//! Marker identities, diagram variants and normalized marker positions.
//!
//! A wiring overlay is described by a [`Variant`] (the fixed topology of
//! markers and segments) and a [`MarkerMap`] holding the normalized position
//! of every marker that is known so far.
//!
//! # Normalized Space
//!
//! Marker positions are stored on a fixed `0..=1000` scale on both axes,
//! independent of the pixel dimensions of any particular image:
//!
//! ```text
//!   (0,0) ─────────── (1000,0)
//!     │                   │
//!     │                   │
//!  (0,1000) ───────── (1000,1000)
//! ```
//!
//! Values outside that range are accepted as-is; they simply map to pixels
//! outside the raster.
//!
//! # Example
//!
//! ```
//! # use wiremark_core::marker::{MarkerId, MarkerMap, MarkerPosition, Variant};
//! let mut map = MarkerMap::new(Variant::ThreePoint);
//! map.insert(MarkerId::P1, MarkerPosition::new(250.0, 500.0)).unwrap();
//!
//! let pixel = map.lookup(MarkerId::P1).unwrap().to_pixel(800, 600);
//! assert_eq!(pixel.x(), 200.0);
//! assert_eq!(pixel.y(), 300.0);
//! assert!(map.lookup(MarkerId::PA).is_none());
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::geometry::{Point, Size};

/// Upper bound of the normalized coordinate scale.
pub const NORMALIZED_SCALE: f32 = 1000.0;

/// Errors produced while building or parsing marker maps.
#[derive(Debug, Error, PartialEq)]
pub enum MarkerError {
    #[error("marker `{marker}` is not part of the {variant} variant")]
    UnknownMarker { marker: MarkerId, variant: Variant },

    #[error("invalid marker data: {0}")]
    Invalid(String),
}

static THREE_POINT_SEGMENTS: [SegmentId; 2] = [
    SegmentId::new(MarkerId::P1, MarkerId::PA),
    SegmentId::new(MarkerId::PA, MarkerId::P2),
];

static FOUR_POINT_SEGMENTS: [SegmentId; 2] = [
    SegmentId::new(MarkerId::P1, MarkerId::P2),
    SegmentId::new(MarkerId::P3, MarkerId::P4),
];

/// The topology of markers and segments in use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Three markers forming a chain: start, intermediate, end.
    #[default]
    ThreePoint,
    /// Four markers forming two independent pairs.
    FourPoint,
}

impl Variant {
    /// Returns the marker identities of this variant in declaration order.
    pub fn markers(self) -> &'static [MarkerId] {
        match self {
            Self::ThreePoint => &[MarkerId::P1, MarkerId::PA, MarkerId::P2],
            Self::FourPoint => &[MarkerId::P1, MarkerId::P2, MarkerId::P3, MarkerId::P4],
        }
    }

    /// Returns the segments of this variant in drawing order.
    pub fn segments(self) -> &'static [SegmentId] {
        match self {
            Self::ThreePoint => &THREE_POINT_SEGMENTS,
            Self::FourPoint => &FOUR_POINT_SEGMENTS,
        }
    }

    /// Returns true if `marker` belongs to this variant.
    pub fn contains(self, marker: MarkerId) -> bool {
        self.markers().contains(&marker)
    }

    /// Returns the first marker of the placement sequence.
    pub fn first(self) -> MarkerId {
        MarkerId::P1
    }

    /// Returns the marker placed after `marker`, if any.
    pub fn next(self, marker: MarkerId) -> Option<MarkerId> {
        let markers = self.markers();
        let index = markers.iter().position(|m| *m == marker)?;
        markers.get(index + 1).copied()
    }

    /// Returns the marker that `marker` snaps against during manual placement.
    ///
    /// A marker's predecessor is the start of the segment it ends, so the
    /// first marker of each chain or pair has none.
    pub fn predecessor(self, marker: MarkerId) -> Option<MarkerId> {
        self.segments()
            .iter()
            .find(|segment| segment.end() == marker)
            .map(|segment| segment.start())
    }

    /// Returns a human-readable name for this variant.
    pub fn name(self) -> &'static str {
        match self {
            Self::ThreePoint => "three-point",
            Self::FourPoint => "four-point",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "three-point" | "3" | "3-point" => Ok(Self::ThreePoint),
            "four-point" | "4" | "4-point" => Ok(Self::FourPoint),
            _ => Err(format!(
                "invalid variant `{s}`, valid values: three-point, four-point"
            )),
        }
    }
}

/// A logical marker identity.
///
/// The derived `Ord` follows declaration order, which matches the sequence
/// order of both variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkerId {
    P1,
    PA,
    P2,
    P3,
    P4,
}

impl MarkerId {
    /// Returns the textual label drawn inside the marker and used as its key
    /// in detector responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::P1 => "1",
            Self::PA => "A",
            Self::P2 => "2",
            Self::P3 => "3",
            Self::P4 => "4",
        }
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A segment connecting two markers, drawn from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId {
    from: MarkerId,
    to: MarkerId,
}

impl SegmentId {
    const fn new(from: MarkerId, to: MarkerId) -> Self {
        Self { from, to }
    }

    /// Returns the start marker.
    pub fn start(self) -> MarkerId {
        self.from
    }

    /// Returns the end marker.
    pub fn end(self) -> MarkerId {
        self.to
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// A marker position in normalized `0..=1000` space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub x: f32,
    pub y: f32,
}

impl MarkerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Maps this position into the pixel space of an image.
    pub fn to_pixel(self, image_width: u32, image_height: u32) -> Point {
        Point::new(
            self.x / NORMALIZED_SCALE * image_width as f32,
            self.y / NORMALIZED_SCALE * image_height as f32,
        )
    }

    /// Maps a pixel offset inside a displayed rectangle into normalized space.
    ///
    /// The offset is not clamped, so points outside `rect` produce values
    /// outside `0..=1000`.
    pub fn from_pixel(point: Point, rect: Size) -> Self {
        Self {
            x: point.x() * NORMALIZED_SCALE / rect.width(),
            y: point.y() * NORMALIZED_SCALE / rect.height(),
        }
    }
}

/// Positions of the markers of one variant.
///
/// Absent markers are a valid state; every iteration follows the variant's
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerMap {
    variant: Variant,
    positions: BTreeMap<MarkerId, MarkerPosition>,
}

impl MarkerMap {
    /// Creates an empty map for `variant`.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            positions: BTreeMap::new(),
        }
    }

    /// Returns the variant this map belongs to.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the position of `marker`, if present.
    pub fn lookup(&self, marker: MarkerId) -> Option<MarkerPosition> {
        self.positions.get(&marker).copied()
    }

    /// Sets the position of `marker`, returning the previous position.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::UnknownMarker`] if `marker` is not part of the
    /// map's variant.
    pub fn insert(
        &mut self,
        marker: MarkerId,
        position: MarkerPosition,
    ) -> Result<Option<MarkerPosition>, MarkerError> {
        if !self.variant.contains(marker) {
            return Err(MarkerError::UnknownMarker {
                marker,
                variant: self.variant,
            });
        }
        Ok(self.positions.insert(marker, position))
    }

    /// Removes `marker`, returning its position if it was present.
    pub fn remove(&mut self, marker: MarkerId) -> Option<MarkerPosition> {
        self.positions.remove(&marker)
    }

    /// Removes every marker.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Returns the number of present markers.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no marker is present.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if every marker of the variant is present.
    pub fn is_complete(&self) -> bool {
        self.positions.len() == self.variant.markers().len()
    }

    /// Iterates over present markers in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, MarkerPosition)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }

    /// Parses a detector-shaped JSON object.
    ///
    /// Keys are the variant's marker labels (`"1"`, `"A"`, ...), values are
    /// `{"x": .., "y": ..}` objects or `null`. Missing keys mean the marker is
    /// absent and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::Invalid`] if the text is not a JSON object, a
    /// marker value is neither `null` nor a numeric `{x, y}` object, or a
    /// coordinate does not fit a finite `f32`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use wiremark_core::marker::{MarkerId, MarkerMap, Variant};
    /// let map = MarkerMap::from_json(
    ///     Variant::ThreePoint,
    ///     r#"{"1": {"x": 100, "y": 200}, "A": null, "2": {"x": 900, "y": 200}}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert!(map.lookup(MarkerId::PA).is_none());
    /// ```
    pub fn from_json(variant: Variant, text: &str) -> Result<Self, MarkerError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| MarkerError::Invalid(format!("malformed JSON: {err}")))?;
        Self::from_json_value(variant, &value)
    }

    /// Builds a map from an already parsed JSON value. See [`MarkerMap::from_json`].
    pub fn from_json_value(variant: Variant, value: &Value) -> Result<Self, MarkerError> {
        let Value::Object(object) = value else {
            return Err(MarkerError::Invalid(format!(
                "expected a JSON object keyed by marker label, found {}",
                json_kind(value)
            )));
        };

        let mut map = Self::new(variant);
        for &marker in variant.markers() {
            let Some(entry) = object.get(marker.label()) else {
                continue;
            };
            let position: Option<MarkerPosition> = serde_json::from_value(entry.clone())
                .map_err(|err| {
                    MarkerError::Invalid(format!(
                        "marker `{marker}` must be an {{x, y}} object or null: {err}"
                    ))
                })?;
            if let Some(position) = position {
                // Numbers beyond f32 range deserialize as infinity.
                if !(position.x.is_finite() && position.y.is_finite()) {
                    return Err(MarkerError::Invalid(format!(
                        "marker `{marker}` has a non-finite coordinate"
                    )));
                }
                map.positions.insert(marker, position);
            }
        }
        Ok(map)
    }

    /// Serializes the map in the detector shape, writing `null` for absent
    /// markers.
    pub fn to_json_value(&self) -> Value {
        let mut object = Map::new();
        for &marker in self.variant.markers() {
            let entry = match self.lookup(marker) {
                Some(pos) => serde_json::json!({ "x": pos.x, "y": pos.y }),
                None => Value::Null,
            };
            object.insert(marker.label().to_string(), entry);
        }
        Value::Object(object)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
