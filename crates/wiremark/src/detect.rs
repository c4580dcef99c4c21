//! Marker detection through an external detector.
//!
//! A [`Detector`] is anything that can look at an encoded image and answer
//! with a raw text response, typically a vision model behind an HTTP API.
//! This module owns everything after the response arrives: fence stripping,
//! JSON parsing and validation into a [`MarkerMap`]. Batches fan out
//! concurrently and fail as a whole if any single call fails.
//!
//! # Example
//!
//! ```
//! # use std::convert::Infallible;
//! # use wiremark::detect::{Detector, detect_batch};
//! # use wiremark_core::marker::{MarkerId, Variant};
//! struct Canned;
//!
//! impl Detector for Canned {
//!     type Error = Infallible;
//!
//!     async fn detect(&self, _image: &[u8], _mime_type: &str) -> Result<String, Infallible> {
//!         Ok(r#"{"1": {"x": 10, "y": 20}, "A": null}"#.to_string())
//!     }
//! }
//!
//! let maps = futures::executor::block_on(
//!     detect_batch(&Canned, b"...", "image/png", Variant::ThreePoint, 2),
//! )
//! .unwrap();
//! assert_eq!(maps.len(), 2);
//! assert!(maps[0].lookup(MarkerId::P1).is_some());
//! ```

use std::{fmt, future::Future};

use futures::future::try_join_all;
use log::{debug, info, trace};

use wiremark_core::marker::{MarkerMap, Variant};

use crate::error::WiremarkError;

/// An external marker detector.
///
/// The response is returned verbatim; parsing happens in [`parse_response`].
pub trait Detector {
    type Error: fmt::Display;

    fn detect(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> impl Future<Output = Result<String, Self::Error>>;
}

/// Parses a raw detector response into a marker map of `variant`.
///
/// Markdown code fences around the JSON are removed first.
///
/// # Errors
///
/// Returns [`WiremarkError::EmptyResult`] for a blank response and
/// [`WiremarkError::Detection`] if the content is not a marker object.
pub fn parse_response(variant: Variant, response: &str) -> Result<MarkerMap, WiremarkError> {
    let body = strip_code_fence(response);
    if body.is_empty() {
        return Err(WiremarkError::EmptyResult);
    }
    trace!(body; "Parsing detector response");
    Ok(MarkerMap::from_json(variant, body)?)
}

/// Removes a surrounding markdown code fence, including its info string.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with(['{', '[']) => body,
        _ => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Runs the detector once and parses its response.
pub async fn detect_once<D: Detector>(
    detector: &D,
    image: &[u8],
    mime_type: &str,
    variant: Variant,
) -> Result<MarkerMap, WiremarkError> {
    let response = detector
        .detect(image, mime_type)
        .await
        .map_err(|err| WiremarkError::Detection(err.to_string()))?;
    let markers = parse_response(variant, &response)?;
    debug!(markers = markers.len(), variant:% = variant; "Detector call finished");
    Ok(markers)
}

/// Runs `count` independent detector calls concurrently.
///
/// Results come back in request order. The first failure fails the whole
/// batch and the remaining calls are dropped.
pub async fn detect_batch<D: Detector>(
    detector: &D,
    image: &[u8],
    mime_type: &str,
    variant: Variant,
    count: usize,
) -> Result<Vec<MarkerMap>, WiremarkError> {
    info!(count, mime_type, variant:% = variant; "Launching detection batch");
    let calls = (0..count).map(|_| detect_once(detector, image, mime_type, variant));
    let maps = try_join_all(calls).await?;
    info!(count = maps.len(); "Detection batch joined");
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        convert::Infallible,
        pin::pin,
        task::{Context, Poll, Waker},
    };

    use futures::{executor::block_on, future::poll_fn, task::noop_waker_ref};
    use wiremark_core::marker::{MarkerId, MarkerPosition};

    use super::*;

    struct Fixed(&'static str);

    impl Detector for Fixed {
        type Error = Infallible;

        async fn detect(&self, _image: &[u8], _mime_type: &str) -> Result<String, Infallible> {
            Ok(self.0.to_string())
        }
    }

    /// Answers from a script, one entry per call.
    struct Scripted {
        responses: Vec<Result<&'static str, &'static str>>,
        calls: Cell<usize>,
    }

    impl Detector for Scripted {
        type Error = String;

        async fn detect(&self, _image: &[u8], _mime_type: &str) -> Result<String, String> {
            let index = self.calls.get();
            self.calls.set(index + 1);
            self.responses[index]
                .map(str::to_string)
                .map_err(str::to_string)
        }
    }

    /// Holds every call until `parties` calls have started.
    struct Rendezvous {
        parties: usize,
        started: Cell<usize>,
        waiting: RefCell<Vec<Waker>>,
    }

    impl Rendezvous {
        fn new(parties: usize) -> Self {
            Self {
                parties,
                started: Cell::new(0),
                waiting: RefCell::new(Vec::new()),
            }
        }
    }

    impl Detector for Rendezvous {
        type Error = Infallible;

        async fn detect(&self, _image: &[u8], _mime_type: &str) -> Result<String, Infallible> {
            let ticket = self.started.get() + 1;
            self.started.set(ticket);
            if ticket == self.parties {
                for waker in self.waiting.borrow_mut().drain(..) {
                    waker.wake();
                }
            }

            poll_fn(|cx| {
                if self.started.get() >= self.parties {
                    Poll::Ready(())
                } else {
                    self.waiting.borrow_mut().push(cx.waker().clone());
                    Poll::Pending
                }
            })
            .await;

            Ok(format!(r#"{{"1": {{"x": {ticket}, "y": 0}}}}"#))
        }
    }

    /// Polls `future` at most `limit` times, returning `None` if it never completes.
    fn poll_bounded<F: Future>(future: F, limit: usize) -> Option<F::Output> {
        let mut future = pin!(future);
        let mut cx = Context::from_waker(noop_waker_ref());
        (0..limit).find_map(|_| match future.as_mut().poll(&mut cx) {
            Poll::Ready(output) => Some(output),
            Poll::Pending => None,
        })
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {\"1\": null}\n"), "{\"1\": null}");
        assert_eq!(
            strip_code_fence("```json\n{\"1\": null}\n```"),
            "{\"1\": null}"
        );
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```{\"A\": null}```"), "{\"A\": null}");
        assert_eq!(strip_code_fence("```json\n```"), "");
    }

    #[test]
    fn test_parse_fenced_response() {
        let markers = parse_response(
            Variant::FourPoint,
            "```json\n{\"1\": {\"x\": 1, \"y\": 2}, \"4\": {\"x\": 3, \"y\": 4}, \"Z\": 9}\n```",
        )
        .unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(
            markers.lookup(MarkerId::P4),
            Some(MarkerPosition::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_parse_blank_response() {
        assert!(matches!(
            parse_response(Variant::ThreePoint, "   \n"),
            Err(WiremarkError::EmptyResult)
        ));
        assert!(matches!(
            parse_response(Variant::ThreePoint, "```\n```"),
            Err(WiremarkError::EmptyResult)
        ));
    }

    #[test]
    fn test_parse_invalid_response() {
        for response in [
            "[1, 2]",
            "\"markers\"",
            "{\"1\": {\"x\": \"left\"}}",
            "{oops",
            "{\"1\": {\"x\": 1e39, \"y\": 500}}",
        ] {
            assert!(
                matches!(
                    parse_response(Variant::ThreePoint, response),
                    Err(WiremarkError::Detection(_))
                ),
                "expected a detection error for {response}"
            );
        }
    }

    #[test]
    fn test_detect_once() {
        let detector = Fixed(r#"{"1": {"x": 100, "y": 200}, "A": null, "2": {"x": 5, "y": 6}}"#);
        let markers =
            block_on(detect_once(&detector, b"img", "image/png", Variant::ThreePoint)).unwrap();
        assert_eq!(markers.len(), 2);
        assert!(markers.lookup(MarkerId::PA).is_none());
    }

    #[test]
    fn test_detect_batch_keeps_request_order() {
        let detector = Scripted {
            responses: vec![
                Ok(r#"{"1": {"x": 1, "y": 1}}"#),
                Ok(r#"{"1": {"x": 2, "y": 2}}"#),
                Ok(r#"{"1": {"x": 3, "y": 3}}"#),
            ],
            calls: Cell::new(0),
        };

        let maps = block_on(detect_batch(
            &detector,
            b"img",
            "image/png",
            Variant::FourPoint,
            3,
        ))
        .unwrap();

        let xs: Vec<f32> = maps
            .iter()
            .map(|map| map.lookup(MarkerId::P1).unwrap().x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_detect_batch_runs_calls_concurrently() {
        let detector = Rendezvous::new(3);
        let batch = detect_batch(&detector, b"img", "image/png", Variant::ThreePoint, 3);

        // Every call waits for the others, so only overlapping calls can finish.
        let maps = poll_bounded(batch, 16)
            .expect("detector calls did not overlap")
            .unwrap();

        assert_eq!(detector.started.get(), 3);
        let xs: Vec<f32> = maps
            .iter()
            .map(|map| map.lookup(MarkerId::P1).unwrap().x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_detect_batch_single_call_needs_no_partner() {
        let detector = Rendezvous::new(1);
        let maps = block_on(detect_batch(
            &detector,
            b"img",
            "image/png",
            Variant::FourPoint,
            1,
        ))
        .unwrap();
        assert_eq!(maps.len(), 1);
    }

    #[test]
    fn test_detect_batch_fails_as_a_whole() {
        let detector = Scripted {
            responses: vec![
                Ok(r#"{"1": {"x": 1, "y": 1}}"#),
                Err("quota exceeded"),
                Ok(r#"{"1": {"x": 3, "y": 3}}"#),
            ],
            calls: Cell::new(0),
        };

        let err = block_on(detect_batch(
            &detector,
            b"img",
            "image/png",
            Variant::FourPoint,
            3,
        ))
        .unwrap_err();
        match err {
            WiremarkError::Detection(message) => assert!(message.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_detect_batch_of_zero() {
        let detector = Fixed("{}");
        let maps = block_on(detect_batch(
            &detector,
            b"img",
            "image/png",
            Variant::ThreePoint,
            0,
        ))
        .unwrap();
        assert!(maps.is_empty());
    }
}
