//! Error adapter for converting WiremarkError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use wiremark::WiremarkError;

/// Adapter for [`WiremarkError`] values.
///
/// Every variant maps to a stable diagnostic code; some carry a short hint.
pub struct ErrorAdapter<'a>(pub &'a WiremarkError);

impl ErrorAdapter<'_> {
    /// The stable diagnostic code of the wrapped error.
    pub fn code_str(&self) -> &'static str {
        match self.0 {
            WiremarkError::Decode(_) => "wiremark::decode",
            WiremarkError::CanvasUnavailable { .. } => "wiremark::canvas",
            WiremarkError::Detection(_) => "wiremark::detection",
            WiremarkError::EmptyResult => "wiremark::empty_result",
            WiremarkError::Encode(_) => "wiremark::encode",
            WiremarkError::Io(_) => "wiremark::io",
            WiremarkError::Config(_) => "wiremark::config",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            WiremarkError::Decode(_) => {
                Some("supported inputs: png, jpeg, webp, bmp, tiff, gif")
            }
            WiremarkError::CanvasUnavailable { .. } => {
                Some("the overlay could not be drawn at this image size; try a smaller image")
            }
            WiremarkError::EmptyResult => Some("the detector found no markers; try again or place them manually"),
            _ => None,
        }
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Convert a [`WiremarkError`] into a list of reportable errors.
///
/// Wiremark errors carry no source spans, so this is always one entry.
pub fn to_reportables(err: &WiremarkError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let cases = [
            (WiremarkError::Decode("bad".to_string()), "wiremark::decode"),
            (
                WiremarkError::CanvasUnavailable {
                    width: 1,
                    height: 1,
                    reason: "surface allocation failed".to_string(),
                },
                "wiremark::canvas",
            ),
            (WiremarkError::Detection("x".to_string()), "wiremark::detection"),
            (WiremarkError::EmptyResult, "wiremark::empty_result"),
            (WiremarkError::Encode("x".to_string()), "wiremark::encode"),
            (WiremarkError::Config("x".to_string()), "wiremark::config"),
        ];

        for (err, code) in &cases {
            let adapter = ErrorAdapter(err);
            assert_eq!(adapter.code_str(), *code);
            assert_eq!(adapter.code().unwrap().to_string(), *code);
        }
    }

    #[test]
    fn test_single_reportable() {
        let err = WiremarkError::Decode("truncated file".to_string());
        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert_eq!(
            reportables[0].to_string(),
            "failed to decode base image: truncated file"
        );
        assert!(reportables[0].help().is_some());
    }

    #[test]
    fn test_io_source_is_forwarded() {
        let err = WiremarkError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let adapter = ErrorAdapter(&err);
        assert_eq!(adapter.code_str(), "wiremark::io");
        assert!(adapter.help().is_none());
    }
}
