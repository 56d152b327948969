// SPDX-License-Identifier: MPL-2.0
//! Integration tests for FFmpeg probing and thumbnail extraction.
//!
//! These tests need a real clip at `tests/data/sample.mp4` and are skipped
//! when it is missing.

use clipcut::application::port::{CancelFlag, FrameSource};
use clipcut::diagnostics::DiagnosticsHandle;
use clipcut::infrastructure::{init_ffmpeg, FfmpegFrameSource};
use clipcut::media::{ThumbnailGenerator, ThumbnailSettings, VideoDescriptor};
use std::path::Path;
use std::sync::Arc;

const SAMPLE: &str = "tests/data/sample.mp4";

fn sample() -> Option<VideoDescriptor> {
    let path = Path::new(SAMPLE);
    let meta = std::fs::metadata(path).ok()?;
    init_ffmpeg().expect("ffmpeg init");
    Some(VideoDescriptor::new(path, meta.len(), None))
}

fn generator() -> ThumbnailGenerator {
    ThumbnailGenerator::new(
        Arc::new(FfmpegFrameSource::new()),
        ThumbnailSettings::default(),
        DiagnosticsHandle::disconnected(),
    )
}

#[tokio::test]
async fn test_probe_sample_mp4() {
    let Some(video) = sample() else {
        return; // Skip if test file doesn't exist
    };

    let metadata = FfmpegFrameSource::new()
        .probe(&video.path, CancelFlag::new())
        .await
        .expect("Should probe MP4");

    assert!(metadata.width > 0, "Width should be > 0");
    assert!(metadata.height > 0, "Height should be > 0");
    assert!(metadata.duration_secs > 0.0, "Duration should be > 0");
}

#[tokio::test]
async fn test_frame_at_start_of_sample() {
    let Some(video) = sample() else {
        return;
    };

    let frame = FfmpegFrameSource::new()
        .frame_at(&video.path, 0.0, CancelFlag::new())
        .await
        .expect("Should decode first frame");

    assert!(frame.width() > 0);
    assert_eq!(
        frame.rgba_bytes().len(),
        frame.width() as usize * frame.height() as usize * 4
    );
}

#[tokio::test]
async fn test_thumbnail_has_canvas_size() {
    let Some(video) = sample() else {
        return;
    };

    let thumbnail = generator()
        .try_generate_thumbnail(&video, 1.0)
        .await
        .expect("Should render thumbnail");

    assert_eq!((thumbnail.width, thumbnail.height), (320, 180));
    // JPEG SOI marker
    assert_eq!(&thumbnail.jpeg_bytes()[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_capture_past_end_still_renders() {
    let Some(video) = sample() else {
        return;
    };

    let thumbnail = generator().generate_thumbnail(&video, 3_600.0).await;
    assert!(thumbnail.is_some(), "Capture position is clamped to the clip");
}

#[tokio::test]
async fn test_pipeline_probes_sample() {
    let Some(video) = sample() else {
        return;
    };

    let videos = generator()
        .generate_thumbnails_for_videos(vec![video], |_, _| {})
        .await;

    assert!(videos[0].is_probed());
    assert!(videos[0].thumbnail.is_some());
}
