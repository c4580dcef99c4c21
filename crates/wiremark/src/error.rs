//! Error types for Wiremark operations.
//!
//! This module provides the main error type [`WiremarkError`] which covers
//! every failure that can surface while decoding, detecting, rendering or
//! encoding an overlay. Missing markers are never an error.

use std::io;

use thiserror::Error;

use wiremark_core::marker::MarkerError;

/// The main error type for Wiremark operations.
#[derive(Debug, Error)]
pub enum WiremarkError {
    /// The base image could not be decoded or has no pixels.
    #[error("failed to decode base image: {0}")]
    Decode(String),

    /// A drawing surface of the requested size could not be set up.
    #[error("cannot prepare a {width}x{height} drawing surface: {reason}")]
    CanvasUnavailable {
        width: u32,
        height: u32,
        reason: String,
    },

    /// The detector failed or returned content that is not a marker map.
    #[error("marker detection failed: {0}")]
    Detection(String),

    /// The detector returned a blank response.
    #[error("marker detection returned an empty result")]
    EmptyResult,

    #[error("failed to encode output image: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<MarkerError> for WiremarkError {
    fn from(err: MarkerError) -> Self {
        Self::Detection(err.to_string())
    }
}
