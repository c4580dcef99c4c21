//! Wiremark - wiring overlays for raster images.
//!
//! Given a base image and the normalized positions of a small set of marker
//! points, Wiremark draws the connecting segments and labelled marker circles
//! on top of the image and re-encodes the result. Marker positions come from
//! an external [`detect::Detector`] or from manual placement
//! ([`wiremark_core::placement`]).

pub mod config;
pub mod detect;
pub mod format;
pub mod raster;
pub mod render;

mod error;

pub use wiremark_core::{color, draw, geometry, marker, placement, style};

pub use error::WiremarkError;

use image::DynamicImage;
use log::{debug, info};

use wiremark_core::{
    marker::{MarkerMap, Variant},
    style::StyleResolver,
};

use config::AppConfig;
use format::OutputFormat;
use render::Overlay;

/// One detection result together with the image rendered from it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDetection {
    markers: MarkerMap,
    image: Vec<u8>,
}

impl RenderedDetection {
    /// The detected marker map.
    pub fn markers(&self) -> &MarkerMap {
        &self.markers
    }

    /// The encoded overlay image.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn into_parts(self) -> (MarkerMap, Vec<u8>) {
        (self.markers, self.image)
    }
}

/// Builder for rendering wiring overlays.
///
/// Holds the [`AppConfig`] every render is resolved against; nothing is read
/// from the environment.
///
/// # Examples
///
/// ```rust,no_run
/// use wiremark::{OverlayBuilder, config::AppConfig};
/// use wiremark::marker::{MarkerMap, Variant};
///
/// let image = std::fs::read("panel.jpg").expect("Failed to read image");
/// let markers = MarkerMap::from_json(
///     Variant::ThreePoint,
///     r#"{"1": {"x": 120, "y": 400}, "A": {"x": 500, "y": 400}, "2": {"x": 500, "y": 820}}"#,
/// )
/// .expect("Failed to parse markers");
///
/// let builder = OverlayBuilder::new(AppConfig::default());
/// let output = builder.render(&image, &markers).expect("Failed to render");
/// std::fs::write("panel-overlay.jpg", output).expect("Failed to write");
/// ```
#[derive(Debug, Default)]
pub struct OverlayBuilder {
    config: AppConfig,
}

impl OverlayBuilder {
    /// Create a new overlay builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Builds the style resolver for `variant` from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WiremarkError::Config`] if a configured color is invalid.
    pub fn resolver(&self, variant: Variant) -> Result<StyleResolver, WiremarkError> {
        self.config
            .style()
            .resolver(variant)
            .map_err(WiremarkError::Config)
    }

    /// Render the overlay of `markers` for a `width` x `height` image as SVG.
    ///
    /// The document has a transparent background; it is the exact layer that
    /// [`OverlayBuilder::render`] composites over the base image.
    ///
    /// # Errors
    ///
    /// Returns [`WiremarkError::Config`] if the style configuration is invalid.
    pub fn render_svg(
        &self,
        markers: &MarkerMap,
        width: u32,
        height: u32,
    ) -> Result<String, WiremarkError> {
        let resolver = self.resolver(markers.variant())?;
        Ok(Overlay::new(&resolver, markers, width, height)
            .to_document()
            .to_string())
    }

    /// Draws `markers` over a decoded base image.
    ///
    /// The result has the same dimensions as `base`. Pixels the overlay does
    /// not cover are copied unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`WiremarkError::CanvasUnavailable`] if no drawing surface of
    /// the image's size can be allocated or the overlay cannot be drawn on it.
    pub fn render_image(
        &self,
        base: &DynamicImage,
        markers: &MarkerMap,
    ) -> Result<DynamicImage, WiremarkError> {
        let (width, height) = (base.width(), base.height());
        info!(
            width,
            height,
            variant:% = markers.variant(),
            markers = markers.len(),
            complete = markers.is_complete();
            "Rendering overlay"
        );

        let svg = self.render_svg(markers, width, height)?;
        let overlay = raster::rasterize(&svg, width, height)?;
        let output = raster::composite(base, &overlay);

        info!("Overlay rendered successfully");
        Ok(output)
    }

    /// Decodes `image`, draws `markers` over it and re-encodes the result.
    ///
    /// The output format is the configured default, else the input's own
    /// format, else PNG.
    ///
    /// # Errors
    ///
    /// Returns [`WiremarkError::Decode`] if the image cannot be decoded, and
    /// any error of [`OverlayBuilder::render_image`] or encoding.
    pub fn render(&self, image: &[u8], markers: &MarkerMap) -> Result<Vec<u8>, WiremarkError> {
        let format = self.output_format(image);
        self.render_as(image, markers, format)
    }

    /// Like [`OverlayBuilder::render`] with an explicit output format.
    pub fn render_as(
        &self,
        image: &[u8],
        markers: &MarkerMap,
        format: OutputFormat,
    ) -> Result<Vec<u8>, WiremarkError> {
        let base = raster::decode(image)?;
        let output = self.render_image(&base, markers)?;
        raster::encode(&output, format)
    }

    /// The format [`OverlayBuilder::render`] writes for `image`.
    pub fn output_format(&self, image: &[u8]) -> OutputFormat {
        self.config
            .output()
            .format()
            .or_else(|| OutputFormat::guess(image))
            .unwrap_or(OutputFormat::Png)
    }

    /// Runs a detection batch on `image` and renders every returned map.
    ///
    /// The batch size and detector MIME type come from the detection
    /// configuration. Results keep request order and each map stays paired
    /// with its own raster. Nothing is rendered unless every detector call
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`WiremarkError::Config`] for a zero batch size,
    /// [`WiremarkError::Decode`] if the image cannot be decoded, and any
    /// detection or rendering error.
    pub async fn detect_and_render<D: detect::Detector>(
        &self,
        detector: &D,
        image: &[u8],
        variant: Variant,
    ) -> Result<Vec<RenderedDetection>, WiremarkError> {
        let detection = self.config.detection();
        let count = detection.batch_size();
        if count == 0 {
            return Err(WiremarkError::Config(
                "detection batch_size must be at least 1".to_string(),
            ));
        }

        let base = raster::decode(image)?;
        let format = self.output_format(image);
        let mime_type = detection
            .mime_type()
            .map(str::to_string)
            .or_else(|| OutputFormat::guess(image).map(|format| format.mime_type().to_string()))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let maps = detect::detect_batch(detector, image, &mime_type, variant, count).await?;

        let mut results = Vec::with_capacity(maps.len());
        for markers in maps {
            let rendered = self.render_image(&base, &markers)?;
            let image = raster::encode(&rendered, format)?;
            debug!(markers = markers.len(), bytes = image.len(); "Paired detection with raster");
            results.push(RenderedDetection { markers, image });
        }
        Ok(results)
    }
}
