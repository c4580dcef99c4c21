//! Wiremark Core Types and Definitions
//!
//! This crate provides the foundational types for Wiremark wiring overlays.
//! It includes:
//!
//! - **Markers**: Marker identities, diagram variants and normalized positions ([`marker`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Pixel-space points and sizes ([`geometry`] module)
//! - **Style**: Resolution of segment and marker styles from image size ([`style`] module)
//! - **Placement**: The manual placement state machine ([`placement`] module)
//! - **Draw**: Drawable overlay elements and render layers ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod marker;
pub mod placement;
pub mod style;
