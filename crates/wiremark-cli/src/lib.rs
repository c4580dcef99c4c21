//! CLI logic for the Wiremark overlay tool.
//!
//! Reads a base image and a marker file, draws the overlay and writes the
//! re-encoded image.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::info;

use wiremark::{OverlayBuilder, WiremarkError, detect::parse_response, format::OutputFormat};

/// Run the Wiremark CLI application
///
/// # Errors
///
/// Returns `WiremarkError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid marker files
/// - Decoding, rendering and encoding errors
pub fn run(args: &Args) -> Result<(), WiremarkError> {
    info!(
        input_path = args.input,
        markers_path = args.markers,
        variant:% = args.variant;
        "Processing image"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let image = fs::read(&args.input)?;
    let markers_json = fs::read_to_string(&args.markers)?;
    let markers = parse_response(args.variant, &markers_json).map_err(|err| {
        WiremarkError::Config(format!("invalid marker file {}: {err}", args.markers))
    })?;

    let builder = OverlayBuilder::new(app_config);
    let format = output_format(args, &builder, &image);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input, format));

    if let Some(svg_path) = &args.svg {
        let base = wiremark::raster::decode(&image)?;
        let svg = builder.render_svg(&markers, base.width(), base.height())?;
        fs::write(svg_path, svg)?;
        info!(svg_file = svg_path; "Overlay SVG written");
    }

    let output = builder.render_as(&image, &markers, format)?;
    fs::write(&output_path, output)?;

    info!(output_file = output_path, format:% = format; "Overlay exported successfully");

    Ok(())
}

/// Explicit flag, else the output file's extension, else the builder default.
fn output_format(args: &Args, builder: &OverlayBuilder, image: &[u8]) -> OutputFormat {
    args.format
        .or_else(|| {
            args.output
                .as_deref()
                .and_then(|path| OutputFormat::from_path(Path::new(path)))
        })
        .unwrap_or_else(|| builder.output_format(image))
}

/// `photo.jpg` becomes `photo-overlay.<format>` next to the input.
fn default_output_path(input: &str, format: OutputFormat) -> String {
    let input = Path::new(input);
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input
        .with_file_name(format!("{stem}-overlay.{format}"))
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("shots/panel.jpg", OutputFormat::Jpeg),
            "shots/panel-overlay.jpeg"
        );
        assert_eq!(
            default_output_path("panel", OutputFormat::Png),
            "panel-overlay.png"
        );
    }
}
