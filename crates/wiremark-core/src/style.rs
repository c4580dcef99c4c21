//! Style resolution for segments and markers.
//!
//! Every visual dimension of an overlay scales with the width of the image
//! it is drawn on, so a diagram looks the same on a thumbnail and on a full
//! resolution photograph. [`StyleResolver`] turns a logical segment identity
//! or the marker role into concrete drawing parameters:
//!
//! - stroke width: `max(min_width, W * width_fraction)`
//! - dash length: `max(min_dash, W * dash_fraction)` for dashed segments
//! - marker radius: `max(min_radius, W * radius_fraction)`
//! - label font size: `1.1 * radius`, shifted down by `0.08 * font size`
//!
//! Resolution is deterministic: it depends only on the image width, the
//! variant and the configured segment styles and colors.
//!
//! # Example
//!
//! ```
//! # use wiremark_core::marker::Variant;
//! # use wiremark_core::style::{SegmentStyle, StyleResolver};
//! let resolver = StyleResolver::new(Variant::ThreePoint);
//! let first = Variant::ThreePoint.segments()[0];
//!
//! assert_eq!(resolver.segment_style(first), SegmentStyle::Solid);
//! let stroke = resolver.resolve_segment(first, 1000);
//! assert!((stroke.width() - 5.0).abs() < 1e-4);
//! ```

use std::{fmt, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    draw::{StrokeDefinition, TextDefinition},
    marker::{SegmentId, Variant},
};

/// Label font size relative to the marker radius.
const LABEL_FONT_RATIO: f32 = 1.1;
/// Baseline shift relative to the label font size.
const LABEL_BASELINE_RATIO: f32 = 0.08;

/// The logical style of a segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStyle {
    /// Continuous line in the primary color.
    #[default]
    Solid,
    /// Dashed line in the secondary color.
    Dashed,
}

impl SegmentStyle {
    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
        }
    }
}

impl fmt::Display for SegmentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SegmentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            _ => Err(format!(
                "invalid segment style `{s}`, valid values: solid, dashed"
            )),
        }
    }
}

/// Size constants of one variant, expressed as fractions of the image width
/// with pixel minimums.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMetrics {
    pub width_fraction: f32,
    pub min_width: f32,
    pub dash_fraction: f32,
    pub min_dash: f32,
    pub radius_fraction: f32,
    pub min_radius: f32,
    /// Border ring width relative to the marker radius.
    pub border_fraction: f32,
    pub min_border: f32,
}

impl StyleMetrics {
    /// Returns the built-in metrics of `variant`.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::ThreePoint => Self {
                width_fraction: 0.005,
                min_width: 3.0,
                dash_fraction: 0.012,
                min_dash: 6.0,
                radius_fraction: 0.015,
                min_radius: 10.0,
                border_fraction: 0.15,
                min_border: 1.0,
            },
            Variant::FourPoint => Self {
                width_fraction: 0.005,
                min_width: 1.0,
                dash_fraction: 0.01,
                min_dash: 4.0,
                radius_fraction: 0.015,
                min_radius: 8.0,
                border_fraction: 0.15,
                min_border: 1.0,
            },
        }
    }

    pub fn stroke_width(&self, image_width: u32) -> f32 {
        scaled(image_width, self.width_fraction, self.min_width)
    }

    pub fn dash_length(&self, image_width: u32) -> f32 {
        scaled(image_width, self.dash_fraction, self.min_dash)
    }

    pub fn marker_radius(&self, image_width: u32) -> f32 {
        scaled(image_width, self.radius_fraction, self.min_radius)
    }
}

fn scaled(image_width: u32, fraction: f32, minimum: f32) -> f32 {
    minimum.max(image_width as f32 * fraction)
}

/// Colors used by an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub solid: Color,
    pub dashed: Color,
    pub marker_fill: Color,
    pub marker_border: Color,
    pub label: Color,
}

impl Palette {
    /// Returns the segment color of `style`.
    pub fn segment_color(&self, style: SegmentStyle) -> Color {
        match style {
            SegmentStyle::Solid => self.solid,
            SegmentStyle::Dashed => self.dashed,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            solid: Color::from_rgb8(255, 0, 0),
            dashed: Color::from_rgb8(0, 0, 255),
            marker_fill: Color::from_rgb8(255, 215, 0),
            marker_border: Color::from_rgb8(184, 134, 11),
            label: Color::from_rgb8(0, 0, 0),
        }
    }
}

/// Concrete drawing parameters of a marker glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    radius: f32,
    border_width: f32,
    fill_color: Color,
    border_color: Color,
    label: TextDefinition,
}

impl MarkerStyle {
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn border_width(&self) -> f32 {
        self.border_width
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    /// Text style of the marker label.
    pub fn label(&self) -> &TextDefinition {
        &self.label
    }
}

/// Maps segments and markers to concrete drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleResolver {
    variant: Variant,
    metrics: StyleMetrics,
    palette: Palette,
    segment_styles: Vec<(SegmentId, SegmentStyle)>,
}

impl StyleResolver {
    /// Creates a resolver with the variant's default metrics, palette and
    /// segment styles: the first segment solid, the second dashed.
    pub fn new(variant: Variant) -> Self {
        let defaults = [SegmentStyle::Solid, SegmentStyle::Dashed];
        let segment_styles = variant
            .segments()
            .iter()
            .copied()
            .zip(defaults)
            .collect();

        Self {
            variant,
            metrics: StyleMetrics::for_variant(variant),
            palette: Palette::default(),
            segment_styles,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn metrics(&self) -> &StyleMetrics {
        &self.metrics
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replaces the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Overrides the style of one segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `segment` is not part of the resolver's variant.
    pub fn set_segment_style(
        &mut self,
        segment: SegmentId,
        style: SegmentStyle,
    ) -> Result<(), String> {
        let variant = self.variant;
        let entry = self
            .segment_styles
            .iter_mut()
            .find(|(id, _)| *id == segment)
            .ok_or_else(|| format!("segment `{segment}` is not part of the {variant} variant"))?;
        entry.1 = style;
        Ok(())
    }

    /// Returns the logical style of `segment`.
    ///
    /// Segments outside the variant fall back to [`SegmentStyle::Solid`].
    pub fn segment_style(&self, segment: SegmentId) -> SegmentStyle {
        self.segment_styles
            .iter()
            .find(|(id, _)| *id == segment)
            .map(|(_, style)| *style)
            .unwrap_or_default()
    }

    /// Builds the stroke of `style` for an image `image_width` pixels wide.
    pub fn resolve_stroke(&self, style: SegmentStyle, image_width: u32) -> StrokeDefinition {
        let color = self.palette.segment_color(style);
        let width = self.metrics.stroke_width(image_width);
        match style {
            SegmentStyle::Solid => StrokeDefinition::solid(color, width),
            SegmentStyle::Dashed => {
                StrokeDefinition::dashed(color, width, self.metrics.dash_length(image_width))
            }
        }
    }

    /// Builds the stroke of `segment` for an image `image_width` pixels wide.
    pub fn resolve_segment(&self, segment: SegmentId, image_width: u32) -> StrokeDefinition {
        let style = self.segment_style(segment);
        let stroke = self.resolve_stroke(style, image_width);
        debug!(
            segment:% = segment,
            style:% = style,
            width = stroke.width();
            "Resolved segment stroke"
        );
        stroke
    }

    /// Builds the marker glyph style for an image `image_width` pixels wide.
    pub fn resolve_marker(&self, image_width: u32) -> MarkerStyle {
        let radius = self.metrics.marker_radius(image_width);
        let border_width = self
            .metrics
            .min_border
            .max(radius * self.metrics.border_fraction);

        let font_size = radius * LABEL_FONT_RATIO;
        let mut label = TextDefinition::new();
        label.set_font_size(font_size);
        label.set_color(self.palette.label);
        label.set_baseline_offset(font_size * LABEL_BASELINE_RATIO);

        MarkerStyle {
            radius,
            border_width,
            fill_color: self.palette.marker_fill,
            border_color: self.palette.marker_border,
            label,
        }
    }
}
