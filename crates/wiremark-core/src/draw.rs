//! Drawable overlay elements.
//!
//! Every element that is positioned by a single point implements
//! [`Drawable`]; segments are defined by two endpoints and render
//! themselves directly. All elements emit SVG nodes into a
//! [`LayeredOutput`], which fixes the compositing order.

mod layer;
mod marker_glyph;
mod positioned;
mod segment;
mod stroke;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use marker_glyph::MarkerGlyph;
pub use positioned::PositionedDrawable;
pub use segment::Segment;
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{Text, TextDefinition};

use crate::geometry::Point;

/// An element that can render itself centered at a pixel position.
pub trait Drawable: std::fmt::Debug {
    fn render_to_layers(&self, position: Point) -> LayeredOutput;
}
