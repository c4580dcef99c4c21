//! Overlay document construction.
//!
//! An [`Overlay`] turns a [`MarkerMap`] into an SVG document the size of the
//! base image: one line per segment whose endpoints are both present, then
//! one glyph per present marker. The document has a transparent background
//! and is rasterized and composited by [`crate::raster`].

use log::{debug, trace};
use svg::Document;

use wiremark_core::{
    draw::{LayeredOutput, MarkerGlyph, PositionedDrawable, Segment},
    marker::MarkerMap,
    style::StyleResolver,
};

/// The vector overlay for one marker map on one image size.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    resolver: &'a StyleResolver,
    markers: &'a MarkerMap,
    width: u32,
    height: u32,
}

impl<'a> Overlay<'a> {
    pub fn new(resolver: &'a StyleResolver, markers: &'a MarkerMap, width: u32, height: u32) -> Self {
        Self {
            resolver,
            markers,
            width,
            height,
        }
    }

    /// Collects the segment and marker nodes of the overlay.
    ///
    /// Segments are emitted in the variant's declaration order and skipped
    /// when an endpoint is missing. Markers follow in declaration order, each
    /// one drawn completely (circle, ring, label) before the next.
    pub fn layers(&self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let (width, height) = (self.width, self.height);

        for &segment in self.markers.variant().segments() {
            let endpoints = (
                self.markers.lookup(segment.start()),
                self.markers.lookup(segment.end()),
            );
            let (Some(start), Some(end)) = endpoints else {
                debug!(segment:% = segment; "Skipping segment with a missing endpoint");
                continue;
            };

            let stroke = self.resolver.resolve_segment(segment, width);
            let line = Segment::new(
                &stroke,
                start.to_pixel(width, height),
                end.to_pixel(width, height),
            );
            output.merge(line.render_to_layers());
        }

        let marker_style = self.resolver.resolve_marker(width);
        for (marker, position) in self.markers.iter() {
            let glyph = PositionedDrawable::new(MarkerGlyph::new(&marker_style, marker.label()))
                .with_position(position.to_pixel(width, height));
            output.merge(glyph.render_to_layers());
        }

        output
    }

    /// Builds the complete SVG document.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", self.width, self.height))
            .set("width", self.width)
            .set("height", self.height);

        for node in self.layers().render() {
            doc = doc.add(node);
        }

        trace!(document:% = doc; "Built overlay document");
        doc
    }
}
