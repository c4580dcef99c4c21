//! Command-line argument definitions for the Wiremark CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the base image, the marker file and the
//! diagram variant, and control output, configuration and logging.

use clap::Parser;

use wiremark::{format::OutputFormat, marker::Variant};

/// Command-line arguments for the Wiremark overlay tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the base image
    #[arg(help = "Path to the base image")]
    pub input: String,

    /// Path to a JSON marker file in the detector response shape
    #[arg(short, long)]
    pub markers: String,

    /// Diagram variant (three-point, four-point)
    #[arg(long, default_value = "three-point")]
    pub variant: Variant,

    /// Path to the output image; defaults to `<input>-overlay.<format>`
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (png, jpeg, webp, bmp, tiff, gif)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Also write the overlay layer as SVG to this path
    #[arg(long)]
    pub svg: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
