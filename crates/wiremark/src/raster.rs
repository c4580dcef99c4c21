//! Raster decoding, overlay rasterization and encoding.
//!
//! The overlay document is rendered onto its own transparent surface and then
//! alpha-composited over the decoded base image, so every base pixel that the
//! overlay does not touch is carried over unmodified.

use std::{
    io::Cursor,
    sync::{Arc, OnceLock},
};

use image::{DynamicImage, Rgba, RgbaImage, imageops};
use log::{debug, info};
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{
        self,
        fontdb::{self, Family, Query},
    },
};

use crate::{error::WiremarkError, format::OutputFormat};

static FONT_DATABASE: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// Returns the process-wide font database, loading system fonts on first use.
fn font_database() -> Arc<fontdb::Database> {
    Arc::clone(FONT_DATABASE.get_or_init(|| Arc::new(load_fonts())))
}

fn load_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let query = Query {
        families: &[Family::SansSerif],
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    if db.query(&query).is_none() {
        // The generic family defaults to a face many systems do not ship.
        let fallback = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
        if let Some(name) = fallback {
            debug!(family:% = name; "Using fallback sans-serif family");
            db.set_sans_serif_family(name);
        }
    }

    info!(faces = db.len(); "Loaded font database");
    db
}

/// Decodes a base image and checks that it has pixels.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, WiremarkError> {
    let image =
        image::load_from_memory(bytes).map_err(|err| WiremarkError::Decode(err.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(WiremarkError::Decode(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(image)
}

/// Rasterizes an SVG document onto a transparent `width` x `height` surface.
pub fn rasterize(svg: &str, width: u32, height: u32) -> Result<RgbaImage, WiremarkError> {
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| WiremarkError::CanvasUnavailable {
        width,
        height,
        reason: "surface allocation failed".to_string(),
    })?;

    let mut options = usvg::Options::default();
    options.fontdb = font_database();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|err| {
        WiremarkError::CanvasUnavailable {
            width,
            height,
            reason: format!("overlay document rejected: {err}"),
        }
    })?;

    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; the image crate expects straight alpha.
    let mut overlay = RgbaImage::new(width, height);
    for (source, target) in pixmap.pixels().iter().zip(overlay.pixels_mut()) {
        let color = source.demultiply();
        *target = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(overlay)
}

/// Alpha-composites `overlay` over `base` at the origin.
///
/// The result keeps an alpha channel only if the base image had one.
pub fn composite(base: &DynamicImage, overlay: &RgbaImage) -> DynamicImage {
    let mut canvas = base.to_rgba8();
    imageops::overlay(&mut canvas, overlay, 0, 0);

    if base.color().has_alpha() {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }
}

/// Encodes `image` as `format`, dropping alpha for formats without it.
pub fn encode(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, WiremarkError> {
    let flattened;
    let image = if !format.supports_alpha() && image.color().has_alpha() {
        flattened = DynamicImage::ImageRgb8(image.to_rgb8());
        &flattened
    } else {
        image
    };

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format.image_format())
        .map_err(|err| WiremarkError::Encode(err.to_string()))?;

    let bytes = cursor.into_inner();
    debug!(format:% = format, bytes = bytes.len(); "Encoded image");
    Ok(bytes)
}
