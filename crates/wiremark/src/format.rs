//! Raster output formats.

use std::{fmt, path::Path, str::FromStr};

use image::ImageFormat;
use serde::Deserialize;

/// A raster format an overlay can be encoded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
    Bmp,
    #[serde(alias = "tif")]
    Tiff,
    Gif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Webp,
        Self::Bmp,
        Self::Tiff,
        Self::Gif,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Gif => "gif",
        }
    }

    /// The matching `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff => ImageFormat::Tiff,
            Self::Gif => ImageFormat::Gif,
        }
    }

    /// Maps an `image` crate format back, if it is one Wiremark can write.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.image_format() == format)
    }

    /// Infers the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.to_ascii_lowercase().parse().ok()
    }

    /// Sniffs the format of encoded image bytes.
    pub fn guess(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes)
            .ok()
            .and_then(Self::from_image_format)
    }

    pub fn mime_type(self) -> &'static str {
        self.image_format().to_mime_type()
    }

    /// Whether the encoder keeps an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "bmp" => Ok(Self::Bmp),
            "tiff" | "tif" => Ok(Self::Tiff),
            "gif" => Ok(Self::Gif),
            _ => Err(format!(
                "unsupported output format `{s}`, valid values: png, jpeg, webp, bmp, tiff, gif"
            )),
        }
    }
}
