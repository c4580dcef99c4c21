//! Provides `PositionedDrawable`, a wrapper for a Drawable and its absolute position.

use crate::{
    draw::{Drawable, LayeredOutput},
    geometry::Point,
};

/// A drawable object together with an absolute pixel position.
///
/// Calls `render_to_layers` on the wrapped drawable, passing in the stored position.
#[derive(Debug, Clone)]
pub struct PositionedDrawable<D: Drawable> {
    drawable: D,
    position: Point,
}

impl<D: Drawable> PositionedDrawable<D> {
    /// Construct a new `PositionedDrawable` from a drawable (position defaults to zero).
    pub fn new(drawable: D) -> Self {
        Self {
            drawable,
            position: Point::default(),
        }
    }

    /// Set the position for this drawable (builder style).
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Render this positioned drawable to layers, using the inner drawable's implementation.
    pub fn render_to_layers(&self) -> LayeredOutput {
        self.drawable.render_to_layers(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Text, TextDefinition};

    #[test]
    fn test_positioned_drawable_defaults_to_origin() {
        let text_def = TextDefinition::default();
        let svg: String = PositionedDrawable::new(Text::new(&text_def, "1"))
            .render_to_layers()
            .render()
            .iter()
            .map(|n| n.to_string())
            .collect();

        assert!(svg.contains("x=\"0\""));
        assert!(svg.contains("y=\"0\""));
    }

    #[test]
    fn test_positioned_drawable_renders_at_stored_position() {
        let text_def = TextDefinition::default();
        let positioned =
            PositionedDrawable::new(Text::new(&text_def, "A")).with_position(Point::new(120.0, 80.0));

        let via_wrapper: String = positioned
            .render_to_layers()
            .render()
            .iter()
            .map(|n| n.to_string())
            .collect();
        let direct: String = Text::new(&text_def, "A")
            .render_to_layers(Point::new(120.0, 80.0))
            .render()
            .iter()
            .map(|n| n.to_string())
            .collect();

        assert_eq!(via_wrapper, direct);
        assert!(via_wrapper.contains("x=\"120\""));
    }
}
