//! Color handling for Wiremark overlays
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, providing convenience methods for working with colors
//! in the Wiremark project.

use std::str::FromStr;

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
/// This provides convenience methods for working with colors in the Wiremark project
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiremark_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates an opaque color from 8-bit sRGB components.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiremark_core::color::Color;
    ///
    /// let yellow = Color::from_rgb8(255, 215, 0);
    /// assert_eq!(yellow.to_rgba8(), [255, 215, 0, 255]);
    /// ```
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let color = color::AlphaColor::<Srgb>::from_rgb8(r, g, b);
        Self {
            color: DynamicColor::from_alpha_color(color),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// The value lies between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the color as 8-bit sRGB components `[r, g, b, a]`.
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }

    /// Returns the opaque part of the color as a `#rrggbb` hex string.
    ///
    /// Opacity is emitted separately (`fill-opacity`, `stroke-opacity`), so
    /// the hex form never carries an alpha channel.
    ///
    /// # Examples
    ///
    /// ```
    /// use wiremark_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// assert_eq!(red.to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}
