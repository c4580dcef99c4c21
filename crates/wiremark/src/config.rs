//! Configuration types for Wiremark overlay rendering.
//!
//! This module provides configuration structures that control how overlays
//! are styled, how detection batches run and which format rendered images
//! are written in. All types implement [`serde::Deserialize`] for loading
//! from external sources; every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`StyleConfig`] - Segment style overrides and segment colors.
//! - [`DetectionConfig`] - Batch size and MIME type sent to the detector.
//! - [`OutputConfig`] - Default output format.
//!
//! # Example
//!
//! ```
//! # use wiremark::config::AppConfig;
//! # use wiremark_core::marker::Variant;
//! let config = AppConfig::default();
//! assert_eq!(config.detection().batch_size(), 1);
//! assert!(config.style().resolver(Variant::ThreePoint).is_ok());
//! ```

use serde::Deserialize;

use wiremark_core::{
    color::Color,
    marker::Variant,
    style::{Palette, SegmentStyle, StyleResolver},
};

use crate::format::OutputFormat;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    detection: DetectionConfig,

    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn new(style: StyleConfig, detection: DetectionConfig, output: OutputConfig) -> Self {
        Self {
            style,
            detection,
            output,
        }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the detection configuration.
    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }
}

/// Style overrides for the two segments of one variant.
///
/// For the three-point variant `first` is `1->A` and `second` is `A->2`;
/// for the four-point variant they are `1->2` and `3->4`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SegmentOverrides {
    #[serde(default)]
    first: Option<SegmentStyle>,

    #[serde(default)]
    second: Option<SegmentStyle>,
}

impl SegmentOverrides {
    pub fn new(first: Option<SegmentStyle>, second: Option<SegmentStyle>) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> Option<SegmentStyle> {
        self.first
    }

    pub fn second(&self) -> Option<SegmentStyle> {
        self.second
    }
}

/// Visual styling configuration.
///
/// Fields that are not set fall back to the built-in defaults: the first
/// segment of every variant solid red, the second dashed blue.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    three_point: SegmentOverrides,

    #[serde(default)]
    four_point: SegmentOverrides,

    /// Color of solid segments, as a CSS color string.
    #[serde(default)]
    solid_color: Option<String>,

    /// Color of dashed segments, as a CSS color string.
    #[serde(default)]
    dashed_color: Option<String>,
}

impl StyleConfig {
    /// Creates a style configuration with segment overrides only.
    pub fn new(three_point: SegmentOverrides, four_point: SegmentOverrides) -> Self {
        Self {
            three_point,
            four_point,
            ..Self::default()
        }
    }

    /// Sets the solid and dashed segment colors (builder style).
    pub fn with_colors(mut self, solid: Option<String>, dashed: Option<String>) -> Self {
        self.solid_color = solid;
        self.dashed_color = dashed;
        self
    }

    /// Returns the segment overrides of `variant`.
    pub fn overrides(&self, variant: Variant) -> SegmentOverrides {
        match variant {
            Variant::ThreePoint => self.three_point,
            Variant::FourPoint => self.four_point,
        }
    }

    /// Returns the parsed solid segment [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn solid_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.solid_color.as_deref(), "solid_color")
    }

    /// Returns the parsed dashed segment [`Color`], if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn dashed_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.dashed_color.as_deref(), "dashed_color")
    }

    /// Builds a [`StyleResolver`] for `variant` with every override applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color is invalid.
    pub fn resolver(&self, variant: Variant) -> Result<StyleResolver, String> {
        let mut palette = Palette::default();
        if let Some(color) = self.solid_color()? {
            palette.solid = color;
        }
        if let Some(color) = self.dashed_color()? {
            palette.dashed = color;
        }

        let mut resolver = StyleResolver::new(variant).with_palette(palette);
        let overrides = self.overrides(variant);
        let styles = [overrides.first(), overrides.second()];
        for (segment, style) in variant.segments().iter().zip(styles) {
            if let Some(style) = style {
                resolver.set_segment_style(*segment, style)?;
            }
        }
        Ok(resolver)
    }
}

fn parse_color(value: Option<&str>, field: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {field} in config: {err}"))
}

/// Detection batch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Number of independent detector calls per image.
    #[serde(default = "default_batch_size")]
    batch_size: usize,

    /// MIME type sent to the detector; sniffed from the image when unset.
    #[serde(default)]
    mime_type: Option<String>,
}

fn default_batch_size() -> usize {
    1
}

impl DetectionConfig {
    pub fn new(batch_size: usize, mime_type: Option<String>) -> Self {
        Self {
            batch_size,
            mime_type,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::new(default_batch_size(), None)
    }
}

/// Output encoding configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OutputConfig {
    /// Default output format; the input's format is kept when unset.
    #[serde(default)]
    format: Option<OutputFormat>,
}

impl OutputConfig {
    pub fn new(format: Option<OutputFormat>) -> Self {
        Self { format }
    }

    pub fn format(&self) -> Option<OutputFormat> {
        self.format
    }
}
