// SPDX-License-Identifier: MPL-2.0
//! Batch thumbnail pipeline.
//!
//! Each clip gets one still frame, letterboxed onto a fixed-size black canvas
//! and encoded as JPEG. Clips are processed in batches of at most
//! [`ThumbnailSettings::max_concurrent`] items; a batch must settle completely
//! before the next one starts. A failing or slow clip only loses its own
//! thumbnail.
//!
//! A clip that runs out of time is reported as timed out right away, but its
//! request keeps its slot until the frame source has actually stopped. The
//! next batch never starts while abandoned decodes are still running.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use futures_util::FutureExt;
use image_rs::codecs::jpeg::JpegEncoder;
use image_rs::imageops::{self, FilterType};
use image_rs::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::application::port::{CancelFlag, FrameSource};
use crate::diagnostics::{AppOperation, DiagnosticsHandle, WarningType};
use crate::domain::{ConcurrencyLimit, JpegQuality, RawFrame, VideoMetadata};
use crate::error::VideoError;
use crate::media::descriptor::{Thumbnail, VideoDescriptor};

/// Seeks stop this far before the end so the last frame is still decodable.
const END_MARGIN_SECS: f64 = 0.1;

const PLACEHOLDER_BACKGROUND: Rgb<u8> = Rgb([0x1a, 0x1a, 0x1a]);
const PLACEHOLDER_ICON: Rgb<u8> = Rgb([0x66, 0x66, 0x66]);

/// Tuning for thumbnail generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbnailSettings {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub quality: JpegQuality,
    /// Batch size.
    pub max_concurrent: ConcurrencyLimit,
    /// Upper bound for one clip, probe included.
    pub timeout: Duration,
    /// Preferred capture position.
    pub capture_at_secs: f64,
}

impl Default for ThumbnailSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            quality: JpegQuality::default(),
            max_concurrent: ConcurrencyLimit::default(),
            timeout: Duration::from_secs(10),
            capture_at_secs: 1.0,
        }
    }
}

/// Where a scaled frame lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Fits `src` inside `dst` keeping the aspect ratio, centered.
///
/// The scaled image touches two opposite canvas edges; the remaining space is
/// split evenly (letterbox or pillarbox). Nothing is cropped.
///
/// # Example
///
/// ```
/// use clipcut::media::thumbnail::fit_within;
///
/// // 4:3 source on a 16:9 canvas is pillarboxed.
/// let p = fit_within((640, 480), (320, 180));
/// assert_eq!((p.x, p.y, p.width, p.height), (40, 0, 240, 180));
/// ```
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_within(src: (u32, u32), dst: (u32, u32)) -> Placement {
    let (src_w, src_h) = (f64::from(src.0.max(1)), f64::from(src.1.max(1)));
    let (dst_w, dst_h) = dst;
    let scale = (f64::from(dst_w) / src_w).min(f64::from(dst_h) / src_h);

    let width = ((src_w * scale).round() as u32).clamp(1, dst_w.max(1));
    let height = ((src_h * scale).round() as u32).clamp(1, dst_h.max(1));

    Placement {
        x: dst_w.saturating_sub(width) / 2,
        y: dst_h.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Draws `frame` centered on a black `width` x `height` canvas.
///
/// # Errors
///
/// Returns an error if the frame buffer does not describe an image.
pub fn render_letterboxed(frame: &RawFrame, width: u32, height: u32) -> Result<RgbImage, VideoError> {
    let source = RgbaImage::from_raw(frame.width(), frame.height(), frame.rgba_bytes().to_vec())
        .ok_or_else(|| VideoError::Other("Frame buffer does not match its size".to_string()))?;

    let placement = fit_within((frame.width(), frame.height()), (width, height));
    let scaled = imageops::resize(
        &source,
        placement.width,
        placement.height,
        FilterType::Triangle,
    );

    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    imageops::overlay(
        &mut canvas,
        &scaled,
        i64::from(placement.x),
        i64::from(placement.y),
    );

    Ok(image_rs::DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Encodes an RGB image as JPEG.
///
/// # Errors
///
/// Returns an error if the encoder rejects the image.
pub fn encode_jpeg(image: &RgbImage, quality: JpegQuality) -> Result<Vec<u8>, VideoError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.value())
        .encode_image(image)
        .map_err(|e| VideoError::Other(format!("JPEG encoding failed: {e}")))?;
    Ok(bytes)
}

/// Dark canvas with a grey play triangle, shown where a thumbnail is missing.
#[must_use]
pub fn render_placeholder(width: u32, height: u32) -> RgbImage {
    let cx = i64::from(width / 2);
    let cy = i64::from(height / 2);
    // Triangle (cx-20, cy-30), (cx-20, cy+30), (cx+30, cy): the vertical
    // half-height shrinks linearly from 30 at the left edge to 0 at the tip.
    RgbImage::from_fn(width, height, |x, y| {
        let dx = i64::from(x) - (cx - 20);
        let dy = (i64::from(y) - cy).abs();
        if (0..=50).contains(&dx) && dy * 50 <= 30 * (50 - dx) {
            PLACEHOLDER_ICON
        } else {
            PLACEHOLDER_BACKGROUND
        }
    })
}

/// Encoded placeholder thumbnail.
///
/// # Errors
///
/// Returns an error if JPEG encoding fails.
pub fn placeholder(width: u32, height: u32, quality: JpegQuality) -> Result<Thumbnail, VideoError> {
    let jpeg = encode_jpeg(&render_placeholder(width, height), quality)?;
    Ok(Thumbnail::new(width, height, jpeg))
}

/// Seek position for a capture request, kept inside the clip.
///
/// ```
/// use clipcut::media::thumbnail::capture_position;
///
/// assert_eq!(capture_position(1.0, 10.0), 1.0);
/// assert!((capture_position(1.0, 0.5) - 0.4).abs() < 1e-9);
/// assert_eq!(capture_position(1.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn capture_position(at_secs: f64, duration_secs: f64) -> f64 {
    at_secs.min((duration_secs - END_MARGIN_SECS).max(0.0)).max(0.0)
}

/// A successful extraction.
#[derive(Debug, Clone)]
struct Extracted {
    thumbnail: Thumbnail,
    /// Set when the clip had to be probed for this extraction.
    metadata: Option<VideoMetadata>,
}

/// A request raced against the per-clip time limit.
enum Attempt<'a, T> {
    Settled(Result<T, VideoError>),
    /// Out of time; resolves once the cancelled request has wound down.
    TimedOut(BoxFuture<'a, ()>),
}

/// Generates thumbnails through a [`FrameSource`].
#[derive(Clone)]
pub struct ThumbnailGenerator {
    source: Arc<dyn FrameSource>,
    settings: ThumbnailSettings,
    diagnostics: DiagnosticsHandle,
}

impl std::fmt::Debug for ThumbnailGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThumbnailGenerator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ThumbnailGenerator {
    pub fn new(
        source: Arc<dyn FrameSource>,
        settings: ThumbnailSettings,
        diagnostics: DiagnosticsHandle,
    ) -> Self {
        Self {
            source,
            settings,
            diagnostics,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ThumbnailSettings {
        &self.settings
    }

    /// Thumbnail for one clip captured near `at_secs`.
    ///
    /// Failures, timeouts included, are logged and yield `None`.
    pub async fn generate_thumbnail(&self, video: &VideoDescriptor, at_secs: f64) -> Option<Thumbnail> {
        match self.extract_with_timeout(video, at_secs).await {
            Ok(extracted) => Some(extracted.thumbnail),
            Err(err) => {
                self.log_thumbnail_failure(video, &err);
                None
            }
        }
    }

    /// Like [`generate_thumbnail`](Self::generate_thumbnail) but reports the
    /// reason of a failure instead of logging it.
    ///
    /// # Errors
    ///
    /// Returns the decoding error or [`VideoError::Timeout`].
    pub async fn try_generate_thumbnail(
        &self,
        video: &VideoDescriptor,
        at_secs: f64,
    ) -> Result<Thumbnail, VideoError> {
        self.extract_with_timeout(video, at_secs)
            .await
            .map(|extracted| extracted.thumbnail)
    }

    /// Annotates every clip with a thumbnail.
    ///
    /// `on_progress(completed, total)` runs once per clip as soon as its
    /// outcome is known, from this task only. The output keeps the input
    /// order; clips that were not probed yet also receive their metadata.
    pub async fn generate_thumbnails_for_videos<F>(
        &self,
        mut videos: Vec<VideoDescriptor>,
        mut on_progress: F,
    ) -> Vec<VideoDescriptor>
    where
        F: FnMut(usize, usize),
    {
        let started = Instant::now();
        let total = videos.len();
        let batch_size = self.settings.max_concurrent.value();
        let at_secs = self.settings.capture_at_secs;

        let mut outcomes: Vec<Option<Result<Extracted, VideoError>>> = vec![None; total];
        let mut completed = 0;

        for (batch_index, batch) in videos.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            let mut pending: FuturesUnordered<_> = batch
                .iter()
                .enumerate()
                .map(|(i, video)| async move {
                    let cancel = CancelFlag::new();
                    let work = self.extract(video, at_secs, cancel.clone()).boxed();
                    (offset + i, self.attempt(work, &cancel).await)
                })
                .collect();
            let mut abandoned: FuturesUnordered<BoxFuture<'_, ()>> = FuturesUnordered::new();

            loop {
                tokio::select! {
                    Some((index, attempt)) = pending.next() => {
                        let outcome = match attempt {
                            Attempt::Settled(result) => result,
                            Attempt::TimedOut(rest) => {
                                abandoned.push(rest);
                                Err(VideoError::Timeout)
                            }
                        };
                        outcomes[index] = Some(outcome);
                        completed += 1;
                        on_progress(completed, total);
                    }
                    Some(()) = abandoned.next() => {}
                    else => break,
                }
            }
        }

        let mut failed = 0;
        for (video, outcome) in videos.iter_mut().zip(outcomes) {
            match outcome {
                Some(Ok(extracted)) => {
                    if let Some(metadata) = extracted.metadata {
                        video.apply_metadata(&metadata);
                    }
                    video.thumbnail = Some(extracted.thumbnail);
                }
                Some(Err(err)) => {
                    failed += 1;
                    video.thumbnail = None;
                    self.log_thumbnail_failure(video, &err);
                }
                None => video.thumbnail = None,
            }
        }

        self.diagnostics
            .log_operation(AppOperation::GenerateThumbnails {
                total,
                failed,
                duration_ms: elapsed_ms(started),
            });

        videos
    }

    /// Reads duration and dimensions for a clip.
    ///
    /// On failure the descriptor keeps its zeroed metadata and a warning is
    /// logged. Returns whether the probe succeeded.
    pub async fn probe_metadata(&self, video: &mut VideoDescriptor) -> bool {
        let started = Instant::now();
        let cancel = CancelFlag::new();
        let outcome = self
            .run_bounded(self.source.probe(&video.path, cancel.clone()), cancel)
            .await;

        let success = match outcome {
            Ok(metadata) => {
                video.apply_metadata(&metadata);
                true
            }
            Err(err) => {
                self.diagnostics.log_warning(
                    WarningType::MetadataUnavailable,
                    format!("{}: {err}", video.name),
                );
                false
            }
        };

        self.diagnostics.log_operation(AppOperation::ProbeMetadata {
            success,
            duration_ms: elapsed_ms(started),
        });
        success
    }

    async fn extract_with_timeout(
        &self,
        video: &VideoDescriptor,
        at_secs: f64,
    ) -> Result<Extracted, VideoError> {
        let cancel = CancelFlag::new();
        self.run_bounded(self.extract(video, at_secs, cancel.clone()).boxed(), cancel)
            .await
    }

    /// Waits for `work` up to the time limit. On timeout `cancel` is raised
    /// and the still-running request is handed back.
    async fn attempt<'a, T>(
        &self,
        mut work: BoxFuture<'a, Result<T, VideoError>>,
        cancel: &CancelFlag,
    ) -> Attempt<'a, T>
    where
        T: Send + 'a,
    {
        match tokio::time::timeout(self.settings.timeout, &mut work).await {
            Ok(result) => Attempt::Settled(result),
            Err(_) => {
                cancel.cancel();
                Attempt::TimedOut(work.map(|_| ()).boxed())
            }
        }
    }

    /// Like [`attempt`](Self::attempt), but a timed-out request is awaited
    /// until it stops before [`VideoError::Timeout`] is returned.
    async fn run_bounded<'a, T>(
        &self,
        work: BoxFuture<'a, Result<T, VideoError>>,
        cancel: CancelFlag,
    ) -> Result<T, VideoError>
    where
        T: Send + 'a,
    {
        match self.attempt(work, &cancel).await {
            Attempt::Settled(result) => result,
            Attempt::TimedOut(rest) => {
                rest.await;
                Err(VideoError::Timeout)
            }
        }
    }

    async fn extract(
        &self,
        video: &VideoDescriptor,
        at_secs: f64,
        cancel: CancelFlag,
    ) -> Result<Extracted, VideoError> {
        let (duration_secs, metadata) = if video.is_probed() {
            (video.duration_ms / 1000.0, None)
        } else {
            let metadata = self.source.probe(&video.path, cancel.clone()).await?;
            (metadata.duration_secs, Some(metadata))
        };

        let position = capture_position(at_secs, duration_secs);
        let frame = self.source.frame_at(&video.path, position, cancel).await?;
        let thumbnail = self.encode_frame(&frame)?;

        Ok(Extracted {
            thumbnail,
            metadata,
        })
    }

    fn encode_frame(&self, frame: &RawFrame) -> Result<Thumbnail, VideoError> {
        let ThumbnailSettings {
            width,
            height,
            quality,
            ..
        } = self.settings;
        let canvas = render_letterboxed(frame, width, height)?;
        let jpeg = encode_jpeg(&canvas, quality)?;
        Ok(Thumbnail::new(width, height, jpeg))
    }

    fn log_thumbnail_failure(&self, video: &VideoDescriptor, err: &VideoError) {
        self.diagnostics.log_warning(
            WarningType::ThumbnailFailed,
            format!("{}: {err}", video.name),
        );
    }
}

#[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
