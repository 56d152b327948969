// SPDX-License-Identifier: MPL-2.0
//! Frame source port.
//!
//! A [`FrameSource`] reads container metadata and decodes a single frame at a
//! given position. The `FFmpeg` adapter in `infrastructure::ffmpeg` is the
//! production implementation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::domain::{RawFrame, VideoMetadata};
use crate::error::VideoError;

/// Stop signal shared between a request and the worker serving it.
///
/// Raised when a request runs out of time. Adapters check it between units of
/// blocking work and give up with [`VideoError::Timeout`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// `Err(VideoError::Timeout)` once the flag is raised.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::Timeout`] after [`cancel`](Self::cancel).
    pub fn check(&self) -> Result<(), VideoError> {
        if self.is_cancelled() {
            Err(VideoError::Timeout)
        } else {
            Ok(())
        }
    }
}

/// Asynchronous access to the frames of a video file.
///
/// The future of a request must not resolve before the work it started has
/// stopped. The thumbnail pipeline counts a request as running until then, and
/// that is what bounds the number of concurrent decodes.
///
/// # Example
///
/// ```ignore
/// use clipcut::application::port::{CancelFlag, FrameSource};
/// use std::path::Path;
///
/// async fn first_frame(source: &dyn FrameSource, path: &Path) {
///     let meta = source.probe(path, CancelFlag::new()).await?;
///     let frame = source
///         .frame_at(path, meta.duration_secs.min(1.0), CancelFlag::new())
///         .await?;
///     println!("{}x{}", frame.width(), frame.height());
/// }
/// ```
pub trait FrameSource: Send + Sync {
    /// Reads the dimensions and duration of the video at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or has no video stream,
    /// or [`VideoError::Timeout`] once `cancel` is raised.
    fn probe<'a>(
        &'a self,
        path: &'a Path,
        cancel: CancelFlag,
    ) -> BoxFuture<'a, Result<VideoMetadata, VideoError>>;

    /// Decodes the first frame at or after `position_secs`.
    ///
    /// Positions past the end are the caller's responsibility; adapters may
    /// return [`VideoError::DecodingFailed`] when nothing can be decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, seeking or decoding fails, or
    /// [`VideoError::Timeout`] once `cancel` is raised.
    fn frame_at<'a>(
        &'a self,
        path: &'a Path,
        position_secs: f64,
        cancel: CancelFlag,
    ) -> BoxFuture<'a, Result<RawFrame, VideoError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    // Verify trait is object-safe
    fn _assert_object_safe(_: &dyn FrameSource) {}

    // Mock implementation for testing
    struct MockSource {
        duration_secs: f64,
    }

    impl FrameSource for MockSource {
        fn probe<'a>(
            &'a self,
            _path: &'a Path,
            _cancel: CancelFlag,
        ) -> BoxFuture<'a, Result<VideoMetadata, VideoError>> {
            let meta = VideoMetadata::new(64, 36, self.duration_secs);
            async move { Ok(meta) }.boxed()
        }

        fn frame_at<'a>(
            &'a self,
            _path: &'a Path,
            position_secs: f64,
            cancel: CancelFlag,
        ) -> BoxFuture<'a, Result<RawFrame, VideoError>> {
            let duration = self.duration_secs;
            async move {
                cancel.check()?;
                if position_secs > duration {
                    return Err(VideoError::DecodingFailed("past end".to_string()));
                }
                RawFrame::solid(64, 36, [255, 0, 0, 255])
                    .ok_or_else(|| VideoError::Other("bad frame".to_string()))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn mock_source_probe_and_frame() {
        let source = MockSource {
            duration_secs: 3.0,
        };
        let path = Path::new("clip.mp4");

        let meta = source.probe(path, CancelFlag::new()).await.expect("probe");
        assert!((meta.duration_secs - 3.0).abs() < f64::EPSILON);

        let frame = source
            .frame_at(path, 1.0, CancelFlag::new())
            .await
            .expect("frame");
        assert_eq!(frame.width(), 64);

        let err = source
            .frame_at(path, 5.0, CancelFlag::new())
            .await
            .expect_err("past end");
        assert!(matches!(err, VideoError::DecodingFailed(_)));
    }

    #[tokio::test]
    async fn raised_flag_stops_the_request() {
        let source = MockSource { duration_secs: 3.0 };
        let cancel = CancelFlag::new();
        let seen_by_worker = cancel.clone();
        cancel.cancel();

        assert!(seen_by_worker.is_cancelled());
        let err = source
            .frame_at(Path::new("clip.mp4"), 1.0, seen_by_worker)
            .await
            .expect_err("cancelled");
        assert_eq!(err, VideoError::Timeout);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let source: Box<dyn FrameSource> = Box::new(MockSource { duration_secs: 1.0 });
        assert!(source
            .probe(Path::new("x.mp4"), CancelFlag::new())
            .await
            .is_ok());
    }
}
