// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`FrameSource`] port trait.
//!
//! Every request opens the file afresh on a blocking worker thread, so one
//! [`FfmpegFrameSource`] can serve any number of concurrent requests. The
//! returned futures resolve only once the worker is done, and a raised
//! [`CancelFlag`] is honored between packets.
//!
//! [`CancelFlag`]: crate::application::port::CancelFlag
//! [`FrameSource`]: crate::application::port::FrameSource

use std::path::{Path, PathBuf};
use std::sync::Once;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::application::port::{CancelFlag, FrameSource};
use crate::domain::{RawFrame, VideoMetadata};
use crate::error::VideoError;

static FFMPEG_INIT: Once = Once::new();

/// Initializes `FFmpeg` once per process and silences its warnings.
///
/// Safe to call repeatedly; only the first call does any work.
///
/// # Errors
///
/// Returns an error if the first initialization failed.
pub fn init_ffmpeg() -> Result<(), VideoError> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(VideoError::Other(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// `FFmpeg`-backed [`FrameSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegFrameSource;

impl FfmpegFrameSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for FfmpegFrameSource {
    fn probe<'a>(
        &'a self,
        path: &'a Path,
        cancel: CancelFlag,
    ) -> BoxFuture<'a, Result<VideoMetadata, VideoError>> {
        let path = path.to_path_buf();
        run_blocking(move || probe_blocking(&path, &cancel)).boxed()
    }

    fn frame_at<'a>(
        &'a self,
        path: &'a Path,
        position_secs: f64,
        cancel: CancelFlag,
    ) -> BoxFuture<'a, Result<RawFrame, VideoError>> {
        let path: PathBuf = path.to_path_buf();
        run_blocking(move || frame_at_blocking(&path, position_secs, &cancel)).boxed()
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, VideoError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, VideoError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| VideoError::Other(format!("Decoder task failed: {e}")))?
}

fn open_input(path: &Path) -> Result<ffmpeg_next::format::context::Input, VideoError> {
    init_ffmpeg()?;
    ffmpeg_next::format::input(&path).map_err(|e| VideoError::from_message(&e.to_string()))
}

fn open_decoder(
    stream: &ffmpeg_next::format::stream::Stream<'_>,
) -> Result<ffmpeg_next::decoder::Video, VideoError> {
    let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
        .map_err(|e| VideoError::DecodingFailed(format!("Failed to create codec context: {e}")))?;
    context
        .decoder()
        .video()
        .map_err(|e| VideoError::DecodingFailed(format!("Failed to create video decoder: {e}")))
}

fn probe_blocking(path: &Path, cancel: &CancelFlag) -> Result<VideoMetadata, VideoError> {
    cancel.check()?;
    let ictx = open_input(path)?;
    let stream = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .ok_or(VideoError::NoVideoStream)?;
    let decoder = open_decoder(&stream)?;

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = if ictx.duration() > 0 {
        ictx.duration() as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
    } else {
        0.0
    };

    Ok(VideoMetadata::new(
        decoder.width(),
        decoder.height(),
        duration_secs,
    ))
}

fn frame_at_blocking(
    path: &Path,
    position_secs: f64,
    cancel: &CancelFlag,
) -> Result<RawFrame, VideoError> {
    cancel.check()?;
    let mut ictx = open_input(path)?;

    let (stream_index, time_base_f64, mut decoder) = {
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;
        let time_base = stream.time_base();
        let time_base_f64 = if time_base.denominator() == 0 {
            0.0
        } else {
            f64::from(time_base.numerator()) / f64::from(time_base.denominator())
        };
        (stream.index(), time_base_f64, open_decoder(&stream)?)
    };

    let position_secs = position_secs.max(0.0);
    if position_secs > 0.0 {
        #[allow(clippy::cast_possible_truncation)]
        let timestamp = (position_secs * f64::from(ffmpeg_next::ffi::AV_TIME_BASE)) as i64;
        ictx.seek(timestamp, ..timestamp)
            .map_err(|e| VideoError::DecodingFailed(format!("Seek failed: {e}")))?;
    }

    cancel.check()?;
    let mut grabber = FrameGrabber::new(&decoder, time_base_f64, position_secs)?;
    let mut decoded = ffmpeg_next::frame::Video::empty();

    for (stream, packet) in ictx.packets() {
        cancel.check()?;
        if stream.index() != stream_index {
            continue;
        }
        decoder
            .send_packet(&packet)
            .map_err(|e| VideoError::DecodingFailed(format!("Failed to send packet: {e}")))?;
        while decoder.receive_frame(&mut decoded).is_ok() {
            if let Some(frame) = grabber.offer(&decoded)? {
                return Ok(frame);
            }
        }
    }

    // Flush frames still buffered in the decoder.
    decoder
        .send_eof()
        .map_err(|e| VideoError::DecodingFailed(format!("Failed to flush decoder: {e}")))?;
    while decoder.receive_frame(&mut decoded).is_ok() {
        if let Some(frame) = grabber.offer(&decoded)? {
            return Ok(frame);
        }
    }

    grabber
        .last
        .ok_or_else(|| VideoError::DecodingFailed("No frame could be decoded".to_string()))
}

/// Picks the first decoded frame at or after the target position.
///
/// Keeps the latest frame seen so a target just past the last frame still
/// yields an image.
struct FrameGrabber {
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    time_base_f64: f64,
    target_secs: f64,
    last: Option<RawFrame>,
}

impl FrameGrabber {
    fn new(
        decoder: &ffmpeg_next::decoder::Video,
        time_base_f64: f64,
        target_secs: f64,
    ) -> Result<Self, VideoError> {
        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::DecodingFailed(format!("Failed to create scaler: {e}")))?;

        Ok(Self {
            scaler,
            width,
            height,
            time_base_f64,
            target_secs,
            last: None,
        })
    }

    fn offer(
        &mut self,
        decoded: &ffmpeg_next::frame::Video,
    ) -> Result<Option<RawFrame>, VideoError> {
        #[allow(clippy::cast_precision_loss)]
        let reached = decoded
            .timestamp()
            .map_or(true, |pts| pts as f64 * self.time_base_f64 >= self.target_secs);

        let mut rgba = ffmpeg_next::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgba)
            .map_err(|e| VideoError::DecodingFailed(format!("Scaling failed: {e}")))?;

        let frame = RawFrame::from_rgba(self.width, self.height, extract_rgba_data(&rgba))
            .ok_or_else(|| VideoError::DecodingFailed("Unexpected frame layout".to_string()))?;

        if reached {
            Ok(Some(frame))
        } else {
            self.last = Some(frame);
            Ok(None)
        }
    }
}

/// Copies RGBA rows out of a scaled frame, dropping the stride padding.
#[allow(clippy::cast_possible_truncation)] // stride is always < u32::MAX for video frames
fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
    let width = frame.width();
    let height = frame.height();
    let data = frame.data(0);
    let stride = frame.stride(0);

    let mut rgba_bytes = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let row_start = (y * stride as u32) as usize;
        let row_end = row_start + (width * 4) as usize;
        rgba_bytes.extend_from_slice(&data[row_start..row_end]);
    }
    rgba_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        assert!(init_ffmpeg().is_ok());
        assert!(init_ffmpeg().is_ok());
    }

    #[tokio::test]
    async fn probe_missing_file_fails() {
        let source = FfmpegFrameSource::new();
        let result = source
            .probe(Path::new("/definitely/not/here.mp4"), CancelFlag::new())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn raised_flag_stops_before_opening() {
        let cancel = CancelFlag::new();
        cancel.cancel();

        let source = FfmpegFrameSource::new();
        let err = source
            .frame_at(Path::new("/definitely/not/here.mp4"), 0.0, cancel)
            .await
            .expect_err("cancelled");
        assert_eq!(err, VideoError::Timeout);
    }

    #[tokio::test]
    async fn frame_from_non_video_fails() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("fake.mp4");
        std::fs::write(&path, b"not a video at all").expect("write");

        let source = FfmpegFrameSource::new();
        assert!(source
            .frame_at(&path, 1.0, CancelFlag::new())
            .await
            .is_err());
    }
}
