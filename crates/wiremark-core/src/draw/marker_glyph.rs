//! Marker glyphs: a filled circle, its border ring and a centered label.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text},
    geometry::Point,
    style::MarkerStyle,
};

/// A labelled marker circle.
///
/// The fill, border ring and label all go to [`RenderLayer::Marker`] in that
/// order, so a later marker covers both the circle and the label of an
/// earlier one it overlaps.
///
/// # Examples
///
/// ```
/// # use wiremark_core::draw::{Drawable, MarkerGlyph, RenderLayer};
/// # use wiremark_core::geometry::Point;
/// # use wiremark_core::marker::Variant;
/// # use wiremark_core::style::StyleResolver;
/// let style = StyleResolver::new(Variant::ThreePoint).resolve_marker(1000);
/// let glyph = MarkerGlyph::new(&style, "A");
///
/// let output = glyph.render_to_layers(Point::new(200.0, 150.0));
/// // Circle with its border ring, then the label
/// assert_eq!(output.count(RenderLayer::Marker), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MarkerGlyph<'a> {
    style: &'a MarkerStyle,
    label: &'a str,
}

impl<'a> MarkerGlyph<'a> {
    pub fn new(style: &'a MarkerStyle, label: &'a str) -> Self {
        Self { style, label }
    }
}

impl Drawable for MarkerGlyph<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let border = StrokeDefinition::solid(self.style.border_color(), self.style.border_width());
        let fill = self.style.fill_color();
        let circle = svg_element::Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", self.style.radius())
            .set("fill", fill.to_hex())
            .set("fill-opacity", fill.alpha());
        let circle = apply_stroke!(circle, &border);
        output.add_to_layer(RenderLayer::Marker, Box::new(circle));

        let label = Text::new(self.style.label(), self.label);
        output.merge(label.render_to_layers(position));

        output
    }
}
