//! Geometric primitives for pixel-space drawing.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in pixel space
//! - [`Size`] - Width and height dimensions
//!
//! # Coordinate System
//!
//! Wiremark uses a coordinate system consistent with SVG and raster images:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Normalized marker positions (see [`crate::marker::MarkerPosition`]) share
//! the same orientation but are expressed on a fixed `0..=1000` scale.

/// A 2D point in pixel space.
///
/// # Examples
///
/// ```
/// # use wiremark_core::geometry::Point;
/// let p = Point::new(10.0, 20.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }
}

/// Represents the dimensions of a raster or display rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if either dimension is zero or negative
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
