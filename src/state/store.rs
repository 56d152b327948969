// SPDX-License-Identifier: MPL-2.0
//! The reactive store.

use super::app_state::{ApplicationState, Panel, TrimHandle, TrimRange};
use super::subscribers::{Field, FieldValue, SubscriberRegistry, SubscriptionId};
use crate::domain::{estimate_export_size, ExportFormat, ExportQuality, ProgressPercent, Volume};
use crate::error::{Result, StoreError};
use crate::media::VideoDescriptor;

/// Owns the application state and its observers.
///
/// Mutators never suspend. Each one applies its change, then hands the new
/// value of every affected field to that field's callbacks. The first
/// failing callback aborts the remaining notifications; the state change
/// itself is kept.
///
/// # Example
///
/// ```
/// use clipcut::state::{Field, Store};
///
/// let mut store = Store::new();
/// let sub = store.subscribe(Field::Ui, |value| {
///     assert!(value.as_ui().is_some_and(|ui| ui.help_visible));
///     Ok(())
/// });
/// store.toggle_help().unwrap();
/// assert!(store.unsubscribe(sub));
/// ```
#[derive(Debug, Default)]
pub struct Store {
    state: ApplicationState,
    subscribers: SubscriberRegistry,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose export settings start from the given defaults.
    #[must_use]
    pub fn with_export_defaults(quality: ExportQuality, format: ExportFormat) -> Self {
        let mut store = Self::default();
        store.state.export_settings.quality = quality;
        store.state.export_settings.format = format;
        store
    }

    #[must_use]
    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn subscribe<F>(&mut self, field: Field, callback: F) -> SubscriptionId
    where
        F: FnMut(&FieldValue<'_>) -> Result<()> + 'static,
    {
        self.subscribers.subscribe(field, Box::new(callback))
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(subscription)
    }

    #[must_use]
    pub fn subscriber_count(&self, field: Field) -> usize {
        self.subscribers.subscriber_count(field)
    }

    /// Makes `video` the current clip and resets trim and playback to it.
    ///
    /// Clearing the selection resets the trim range to `[0, 0]`.
    ///
    /// # Errors
    ///
    /// [`StoreError::BlockedVideo`] if the clip is too large to load; the
    /// state is left unchanged. Otherwise any subscriber error.
    pub fn set_current_video(&mut self, video: Option<VideoDescriptor>) -> Result<()> {
        let duration = match &video {
            Some(v) if !v.can_load() => {
                return Err(StoreError::BlockedVideo(v.name.clone()).into());
            }
            Some(v) => v.duration_ms,
            None => 0.0,
        };

        self.state.current_video = video;
        self.state.trim_range = TrimRange::new(0.0, duration);
        self.state.playback.duration = duration;
        self.state.playback.current_time = 0.0;
        self.state.playback.is_playing = false;
        if self.state.current_video.is_some() {
            self.recompute_estimate();
        } else {
            self.state.export_settings.estimated_size = 0;
        }

        self.notify(&[
            Field::CurrentVideo,
            Field::TrimRange,
            Field::Playback,
            Field::ExportSettings,
        ])
    }

    /// Sets the trim range, clamped to `[0, duration]`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvertedTrimRange`] when start lies after end once
    /// clamped; the state is left unchanged. Otherwise any subscriber error.
    pub fn set_trim_range(&mut self, start: f64, end: f64) -> Result<()> {
        let start = start.max(0.0);
        let end = end.min(self.state.playback.duration);
        if start > end {
            return Err(StoreError::InvertedTrimRange { start, end }.into());
        }

        self.state.trim_range = TrimRange::new(start, end);
        self.notify(&[Field::TrimRange])?;

        if self.state.current_video.is_some() {
            self.recompute_estimate();
            self.notify(&[Field::ExportSettings])?;
        }
        Ok(())
    }

    /// Moves one end of the trim range to `fraction` of the timeline.
    ///
    /// The handle cannot be dragged past the other end.
    ///
    /// # Errors
    ///
    /// Same as [`set_trim_range`](Self::set_trim_range).
    pub fn set_trim_handle(&mut self, handle: TrimHandle, fraction: f64) -> Result<()> {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let position = fraction * self.state.playback.duration;
        let TrimRange { start, end } = self.state.trim_range;
        match handle {
            TrimHandle::Start => self.set_trim_range(position.min(end), end),
            TrimHandle::End => self.set_trim_range(start, position.max(start)),
        }
    }

    pub fn set_playback_state(&mut self, is_playing: bool) -> Result<()> {
        self.state.playback.is_playing = is_playing;
        self.notify(&[Field::Playback])
    }

    /// Sets the playhead, clamped to `[0, duration]`.
    pub fn set_current_time(&mut self, time_ms: f64) -> Result<()> {
        let duration = self.state.playback.duration;
        self.state.playback.current_time = if time_ms.is_nan() {
            0.0
        } else {
            time_ms.clamp(0.0, duration.max(0.0))
        };
        self.notify(&[Field::Playback])
    }

    /// Moves the playhead by `delta_ms`, staying inside the clip.
    pub fn seek_by(&mut self, delta_ms: f64) -> Result<()> {
        let target = self.state.playback.current_time + delta_ms;
        self.set_current_time(target)
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.state.playback.volume = Volume::new(volume);
        self.notify(&[Field::Playback])
    }

    pub fn set_export_quality(&mut self, quality: ExportQuality) -> Result<()> {
        self.state.export_settings.quality = quality;
        self.recompute_estimate();
        self.notify(&[Field::ExportSettings])
    }

    pub fn set_export_format(&mut self, format: ExportFormat) -> Result<()> {
        self.state.export_settings.format = format;
        self.recompute_estimate();
        self.notify(&[Field::ExportSettings])
    }

    pub fn set_export_progress(&mut self, percent: u32, status: impl Into<String>) -> Result<()> {
        self.state.export_progress.progress = ProgressPercent::new(percent);
        self.state.export_progress.status = status.into();
        self.notify(&[Field::ExportProgress])
    }

    pub fn start_export(&mut self) -> Result<()> {
        let progress = &mut self.state.export_progress;
        progress.is_exporting = true;
        progress.progress = ProgressPercent::default();
        progress.status = "Starting export...".to_string();
        self.notify(&[Field::ExportProgress])
    }

    pub fn complete_export(&mut self) -> Result<()> {
        let progress = &mut self.state.export_progress;
        progress.is_exporting = false;
        progress.progress = ProgressPercent::COMPLETE;
        progress.status = "Export complete!".to_string();
        self.notify(&[Field::ExportProgress])
    }

    /// Ends a failed export so another one can start.
    ///
    /// Progress drops back to 0, never to [`ProgressPercent::COMPLETE`].
    pub fn abort_export(&mut self, status: impl Into<String>) -> Result<()> {
        let progress = &mut self.state.export_progress;
        progress.is_exporting = false;
        progress.progress = ProgressPercent::default();
        progress.status = status.into();
        self.notify(&[Field::ExportProgress])
    }

    /// Replaces the library.
    pub fn add_videos_to_library(&mut self, videos: Vec<VideoDescriptor>) -> Result<()> {
        self.state.video_library = videos;
        self.notify(&[Field::VideoLibrary])
    }

    /// Makes the library entry at `index` the current clip.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`], or any error of
    /// [`set_current_video`](Self::set_current_video).
    pub fn select_from_library(&mut self, index: usize) -> Result<()> {
        let video = self
            .state
            .video_library
            .get(index)
            .cloned()
            .ok_or(StoreError::IndexOutOfRange(index))?;
        self.set_current_video(Some(video))
    }

    pub fn toggle_help(&mut self) -> Result<()> {
        self.state.ui.help_visible = !self.state.ui.help_visible;
        self.notify(&[Field::Ui])
    }

    pub fn select_panel(&mut self, panel: Panel) -> Result<()> {
        self.state.ui.selected_panel = panel;
        self.notify(&[Field::Ui])
    }

    /// No-op without a current clip or before its duration is known.
    fn recompute_estimate(&mut self) {
        let Some(video) = &self.state.current_video else {
            return;
        };
        let settings = &mut self.state.export_settings;
        if let Some(size) = estimate_export_size(
            video.size,
            video.duration_ms,
            self.state.trim_range.start,
            self.state.trim_range.end,
            settings.quality,
            settings.format,
        ) {
            settings.estimated_size = size;
        }
    }

    fn notify(&mut self, fields: &[Field]) -> Result<()> {
        for &field in fields {
            self.subscribers
                .dispatch(&FieldValue::of(&self.state, field))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VideoMetadata;
    use crate::error::Error;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MIB: u64 = 1024 * 1024;

    fn clip(name: &str, size: u64, duration_secs: f64) -> VideoDescriptor {
        let mut video = VideoDescriptor::new(format!("/clips/{name}"), size, None);
        video.apply_metadata(&VideoMetadata::new(1920, 1080, duration_secs));
        video
    }

    fn store_with_clip(size: u64, duration_secs: f64) -> Store {
        let mut store = Store::new();
        store
            .set_current_video(Some(clip("a.mp4", size, duration_secs)))
            .expect("select clip");
        store
    }

    #[test]
    fn selecting_a_clip_resets_trim_and_playback() {
        let mut store = store_with_clip(10 * MIB, 60.0);
        store.set_current_time(5_000.0).expect("seek");
        store.set_playback_state(true).expect("play");

        store
            .set_current_video(Some(clip("b.mp4", MIB, 30.0)))
            .expect("select");

        let state = store.state();
        assert_eq!(state.trim_range, TrimRange::new(0.0, 30_000.0));
        assert_relative_eq!(state.playback.duration, 30_000.0);
        assert_relative_eq!(state.playback.current_time, 0.0);
        assert!(!state.playback.is_playing);
    }

    #[test]
    fn blocked_clip_is_rejected_without_change() {
        let mut store = store_with_clip(MIB, 10.0);
        let err = store
            .set_current_video(Some(clip("huge.mp4", 600 * MIB, 10.0)))
            .expect_err("blocked");

        assert!(matches!(err, Error::Store(StoreError::BlockedVideo(name)) if name == "huge.mp4"));
        assert_eq!(
            store.state().current_video.as_ref().map(|v| v.name.as_str()),
            Some("a.mp4")
        );
    }

    #[test]
    fn clearing_selection_resets_range() {
        let mut store = store_with_clip(MIB, 10.0);
        store.set_current_video(None).expect("clear");
        assert_eq!(store.state().trim_range, TrimRange::new(0.0, 0.0));
        assert_eq!(store.state().export_settings.estimated_size, 0);
    }

    #[test]
    fn trim_range_is_clamped() {
        let mut store = store_with_clip(MIB, 10.0);
        store.set_trim_range(-500.0, 99_000.0).expect("trim");
        assert_eq!(store.state().trim_range, TrimRange::new(0.0, 10_000.0));
    }

    #[test]
    fn inverted_trim_range_is_rejected() {
        let mut store = store_with_clip(MIB, 10.0);
        store.set_trim_range(1_000.0, 4_000.0).expect("trim");

        let err = store.set_trim_range(6_000.0, 2_000.0).expect_err("inverted");
        assert!(matches!(
            err,
            Error::Store(StoreError::InvertedTrimRange { .. })
        ));
        assert_eq!(store.state().trim_range, TrimRange::new(1_000.0, 4_000.0));
    }

    #[test]
    fn trim_updates_estimate() {
        let mut store = store_with_clip(1_000_000, 10.0);
        // Full clip, medium mp4: half of the source.
        assert_eq!(store.state().export_settings.estimated_size, 500_000);

        store.set_trim_range(0.0, 5_000.0).expect("trim");
        assert_eq!(store.state().export_settings.estimated_size, 250_000);
    }

    #[test]
    fn trim_without_clip_does_not_touch_estimate() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = Store::new();
        let counter = Rc::clone(&calls);
        store.subscribe(Field::ExportSettings, move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        store.set_trim_range(0.0, 0.0).expect("trim");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn quality_change_is_idempotent() {
        let mut store = store_with_clip(1_000_000, 10.0);
        store.set_export_quality(ExportQuality::Strong).expect("quality");
        let first = store.state().export_settings.estimated_size;
        store.set_export_quality(ExportQuality::Strong).expect("quality");

        assert_eq!(first, 300_000);
        assert_eq!(store.state().export_settings.estimated_size, first);
    }

    #[test]
    fn format_change_scales_estimate() {
        let mut store = store_with_clip(1_000_000, 10.0);
        store.set_export_format(ExportFormat::Gif).expect("format");
        assert_eq!(store.state().export_settings.estimated_size, 1_250_000);
    }

    #[test]
    fn trim_handles_move_one_end() {
        let mut store = store_with_clip(MIB, 10.0);
        store.set_trim_handle(TrimHandle::Start, 0.25).expect("start");
        store.set_trim_handle(TrimHandle::End, 0.5).expect("end");
        assert_eq!(store.state().trim_range, TrimRange::new(2_500.0, 5_000.0));

        // The start handle cannot pass the end handle.
        store.set_trim_handle(TrimHandle::Start, 0.9).expect("start");
        assert_eq!(store.state().trim_range, TrimRange::new(5_000.0, 5_000.0));
    }

    #[test]
    fn seek_by_stays_inside_clip() {
        let mut store = store_with_clip(MIB, 10.0);
        store.seek_by(-5_000.0).expect("seek");
        assert_relative_eq!(store.state().playback.current_time, 0.0);
        store.seek_by(25_000.0).expect("seek");
        assert_relative_eq!(store.state().playback.current_time, 10_000.0);
    }

    #[test]
    fn volume_is_clamped() {
        let mut store = Store::new();
        store.set_volume(3.0).expect("volume");
        assert_relative_eq!(store.state().playback.volume.value(), 1.0);
    }

    #[test]
    fn export_lifecycle() {
        let mut store = Store::new();
        store.start_export().expect("start");
        assert!(store.state().export_progress.is_exporting);

        store
            .set_export_progress(40, "Processing... 40%")
            .expect("progress");
        assert_eq!(store.state().export_progress.progress.value(), 40);

        store.complete_export().expect("complete");
        let progress = &store.state().export_progress;
        assert!(!progress.is_exporting);
        assert!(progress.progress.is_complete());
    }

    #[test]
    fn abort_export_clears_the_running_flag() {
        let mut store = Store::new();
        store.start_export().expect("start");
        store
            .set_export_progress(70, "Processing... 70%")
            .expect("progress");

        store.abort_export("Export failed: disk full").expect("abort");
        let progress = &store.state().export_progress;
        assert!(!progress.is_exporting);
        assert_eq!(progress.progress.value(), 0);
        assert_eq!(progress.status, "Export failed: disk full");
    }

    #[test]
    fn select_from_library_checks_index() {
        let mut store = Store::new();
        store
            .add_videos_to_library(vec![clip("a.mp4", MIB, 3.0)])
            .expect("library");

        store.select_from_library(0).expect("select");
        assert!(store.state().current_video.is_some());

        let err = store.select_from_library(4).expect_err("out of range");
        assert!(matches!(err, Error::Store(StoreError::IndexOutOfRange(4))));
    }

    #[test]
    fn ui_mutators_notify_ui() {
        let panels = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new();
        let seen = Rc::clone(&panels);
        store.subscribe(Field::Ui, move |value| {
            if let Some(ui) = value.as_ui() {
                seen.borrow_mut().push((ui.selected_panel, ui.help_visible));
            }
            Ok(())
        });

        store.select_panel(Panel::Export).expect("panel");
        store.toggle_help().expect("help");

        assert_eq!(
            *panels.borrow(),
            vec![(Panel::Export, false), (Panel::Export, true)]
        );
    }

    #[test]
    fn subscriber_error_is_returned_but_change_kept() {
        let mut store = Store::new();
        store.subscribe(Field::Ui, |_| Err(Error::Subscriber("boom".into())));

        assert!(store.toggle_help().is_err());
        assert!(store.state().ui.help_visible);
    }

    #[test]
    fn export_defaults_are_applied() {
        let store = Store::with_export_defaults(ExportQuality::Light, ExportFormat::Gif);
        assert_eq!(store.state().export_settings.quality, ExportQuality::Light);
        assert_eq!(store.state().export_settings.format, ExportFormat::Gif);
    }
}
