//! Text rendering definitions for marker labels.
//!
//! Text is rendered as an SVG `<text>` element centered on its position.
//! Glyph shaping and exact metrics are left to the rasterizer; the
//! [`TextDefinition::baseline_offset`] nudges the baseline so that digits
//! and capitals look vertically centered with common sans-serif fonts.
//!
//! # Quick Start
//!
//! ```
//! # use wiremark_core::draw::{Drawable, TextDefinition, Text};
//! # use wiremark_core::geometry::Point;
//! let mut style = TextDefinition::new();
//! style.set_font_size(22.0);
//!
//! let text = Text::new(&style, "A");
//! let output = text.render_to_layers(Point::new(100.0, 100.0));
//! assert!(!output.is_empty());
//! ```

use svg::{node::Text as SvgText, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::Point,
};

/// Defines the visual style for label text.
///
/// # Default Values
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `15` |
/// | Font weight | `"bold"` |
/// | Text color | black |
/// | Baseline offset | `0.0` |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: f32,
    font_weight: String,
    color: Color,
    baseline_offset: f32,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in pixels.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Sets the text color.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Sets the downward baseline shift, in pixels, applied after centering.
    pub fn set_baseline_offset(&mut self, offset: f32) {
        self.baseline_offset = offset;
    }

    /// Returns the font size in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Returns the font family.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Returns the text color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the baseline shift in pixels.
    pub fn baseline_offset(&self) -> f32 {
        self.baseline_offset
    }

    fn font_weight(&self) -> &str {
        &self.font_weight
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 15.0,
            font_weight: "bold".to_string(),
            color: Color::default(),
            baseline_offset: 0.0,
        }
    }
}

/// A renderable single-line text element combining content with styling.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    /// Creates a new text element with the given definition and content.
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if self.content.is_empty() {
            return output;
        }

        let color = self.definition.color();
        let rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + self.definition.baseline_offset())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size())
            .set("font-weight", self.definition.font_weight())
            .set("fill", color.to_hex())
            .set("fill-opacity", color.alpha())
            .add(SvgText::new(self.content));

        // Labels share the marker layer so each one stays paired with its circle.
        output.add_to_layer(RenderLayer::Marker, Box::new(rendered_text));
        output
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let def = TextDefinition::new();
        assert_approx_eq!(f32, def.font_size(), 15.0);
        assert_eq!(def.font_family(), "sans-serif");
        assert_eq!(def.color(), Color::default());
        assert_approx_eq!(f32, def.baseline_offset(), 0.0);
    }

    #[test]
    fn test_text_definition_setters() {
        let mut def = TextDefinition::new();
        def.set_font_size(24.0);
        def.set_color(Color::new("navy").unwrap());
        def.set_baseline_offset(1.5);

        assert_approx_eq!(f32, def.font_size(), 24.0);
        assert_eq!(def.font_family(), "sans-serif");
        assert_eq!(def.font_weight(), "bold");
        assert_eq!(def.color().to_hex(), "#000080");
        assert_approx_eq!(f32, def.baseline_offset(), 1.5);
    }

    #[test]
    fn test_text_render_applies_baseline_offset() {
        let mut def = TextDefinition::new();
        def.set_baseline_offset(2.0);
        let text = Text::new(&def, "A");

        let output = text.render_to_layers(Point::new(50.0, 40.0));
        assert_eq!(output.count(RenderLayer::Marker), 1);

        let svg: String = output.render().iter().map(|n| n.to_string()).collect();
        assert!(svg.contains("x=\"50\""));
        assert!(svg.contains("y=\"42\""));
        assert!(svg.contains("text-anchor=\"middle\""));
        // The svg crate writes text content on its own line.
        assert!(svg.contains("\nA\n"));
    }

    #[test]
    fn test_text_render_empty_is_empty() {
        let def = TextDefinition::new();
        let text = Text::new(&def, "");
        assert!(text.render_to_layers(Point::default()).is_empty());
    }
}
