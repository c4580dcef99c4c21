//! Straight line segments between two marker positions.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::Point,
};

/// A stroked line between two pixel-space points.
///
/// # Examples
///
/// ```
/// # use wiremark_core::draw::{RenderLayer, Segment, StrokeDefinition};
/// # use wiremark_core::geometry::Point;
/// let stroke = StrokeDefinition::default();
/// let segment = Segment::new(&stroke, Point::new(0.0, 0.0), Point::new(30.0, 40.0));
///
/// let output = segment.render_to_layers();
/// assert_eq!(output.count(RenderLayer::Segment), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    stroke: &'a StrokeDefinition,
    start: Point,
    end: Point,
}

impl<'a> Segment<'a> {
    pub fn new(stroke: &'a StrokeDefinition, start: Point, end: Point) -> Self {
        Self { stroke, start, end }
    }

    /// Renders the line onto the [`RenderLayer::Segment`] layer.
    pub fn render_to_layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let line = svg_element::Line::new()
            .set("x1", self.start.x())
            .set("y1", self.start.y())
            .set("x2", self.end.x())
            .set("y2", self.end.y())
            .set("fill", "none");
        let line = apply_stroke!(line, self.stroke);

        output.add_to_layer(RenderLayer::Segment, Box::new(line));
        output
    }
}
