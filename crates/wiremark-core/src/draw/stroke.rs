//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! Exported types:
//! - [`StrokeDefinition`]: Color, width and dash style of a stroke
//! - [`StrokeStyle`]: Solid or dashed line patterns
//! - [`apply_stroke!`](crate::apply_stroke!): Macro for applying stroke attributes to SVG elements
//!
//! The stroke system follows SVG terminology. Dash lengths are absolute
//! pixel values; the style resolver (see [`crate::style`]) derives them from
//! the image width before a stroke is built. Line ends are always butt caps,
//! so a segment stops exactly at its endpoints.
//!
//! # Quick Start
//!
//! ```
//! use wiremark_core::draw::{StrokeDefinition, StrokeStyle};
//! use wiremark_core::color::Color;
//!
//! let solid = StrokeDefinition::solid(Color::new("red").unwrap(), 3.0);
//! assert_eq!(solid.style().to_svg_value(), None);
//!
//! let dashed = StrokeDefinition::dashed(Color::new("blue").unwrap(), 2.0, 12.0);
//! assert_eq!(dashed.style().to_svg_value().as_deref(), Some("12,12"));
//! ```
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#ff0000"`, `0.5` |
//! | `width` | `stroke-width` | `2.0` |
//! | `style` | `stroke-dasharray` | `"12,12"` |

use crate::color::Color;

/// Defines the dash pattern of a stroke.
///
/// # SVG Mapping
///
/// - `Solid`: No dasharray attribute
/// - `Dashed(d)`: `"d,d"` (equal dash and gap)
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashed line with equal dash and gap lengths, in pixels
    Dashed(f32),
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed(length) => Some(format!("{length},{length}")),
        }
    }
}

/// A stroke definition for rendering segments and marker borders.
///
/// # Examples
///
/// ```
/// use wiremark_core::draw::{StrokeDefinition, StrokeStyle};
/// use wiremark_core::color::Color;
///
/// // Default stroke (black, 1px, solid)
/// let stroke = StrokeDefinition::default();
/// assert_eq!(*stroke.style(), StrokeStyle::Solid);
///
/// let mut stroke = StrokeDefinition::new(Color::new("green").unwrap(), 3.0);
/// stroke.set_style(StrokeStyle::Dashed(9.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Creates a solid stroke (convenience constructor).
    pub fn solid(color: Color, width: f32) -> Self {
        Self::new(color, width)
    }

    /// Creates a dashed stroke with equal dash and gap length.
    pub fn dashed(color: Color, width: f32, dash: f32) -> Self {
        let mut stroke = Self::new(color, width);
        stroke.set_style(StrokeStyle::Dashed(dash));
        stroke
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Sets the stroke style.
    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            style: StrokeStyle::default(),
        }
    }
}

/// Apply all stroke attributes to an SVG element.
///
/// This macro applies color, opacity, width, a butt line cap and the dash
/// pattern (if not solid) to any SVG element.
///
/// # Examples
///
/// ```
/// use wiremark_core::draw::StrokeDefinition;
/// use wiremark_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::dashed(Color::new("blue").unwrap(), 2.0, 8.0);
/// let line = svg_element::Line::new()
///     .set("x1", 0)
///     .set("y1", 0)
///     .set("x2", 100)
///     .set("y2", 0);
///
/// let line = wiremark_core::apply_stroke!(line, &stroke);
/// assert!(line.to_string().contains("stroke-dasharray=\"8,8\""));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_hex())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", "butt");

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "black");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
    }

    #[test]
    fn test_stroke_constructors() {
        let color = Color::new("red").unwrap();

        let solid = StrokeDefinition::solid(color, 2.0);
        assert_eq!(solid.width(), 2.0);
        assert_eq!(*solid.style(), StrokeStyle::Solid);

        let dashed = StrokeDefinition::dashed(color, 1.5, 6.0);
        assert_eq!(*dashed.style(), StrokeStyle::Dashed(6.0));
    }

    #[test]
    fn test_stroke_style_svg_value() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(
            StrokeStyle::Dashed(5.0).to_svg_value(),
            Some("5,5".to_string())
        );
        assert_eq!(
            StrokeStyle::Dashed(9.6).to_svg_value(),
            Some("9.6,9.6".to_string())
        );
    }

    #[test]
    fn test_apply_stroke_solid_has_no_dasharray() {
        let stroke = StrokeDefinition::solid(Color::new("red").unwrap(), 3.0);
        let line = svg::node::element::Line::new();
        let rendered = crate::apply_stroke!(line, &stroke).to_string();
        assert!(rendered.contains("stroke=\"#ff0000\""));
        assert!(rendered.contains("stroke-width=\"3\""));
        assert!(rendered.contains("stroke-linecap=\"butt\""));
        assert!(!rendered.contains("stroke-dasharray"));
    }
}
