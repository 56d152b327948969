// SPDX-License-Identifier: MPL-2.0
//! Plain data records held by the store.

use crate::domain::{ExportFormat, ExportQuality, ProgressPercent, Volume};
use crate::media::VideoDescriptor;

/// Selected portion of the current clip, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the range in milliseconds.
    #[must_use]
    pub fn len_ms(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// One end of the trim range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimHandle {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Position in milliseconds.
    pub current_time: f64,
    /// Duration in milliseconds.
    pub duration: f64,
    pub volume: Volume,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExportSettings {
    pub quality: ExportQuality,
    pub format: ExportFormat,
    /// Derived from the trim range and settings; bytes.
    pub estimated_size: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportProgress {
    pub is_exporting: bool,
    pub progress: ProgressPercent,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Library,
    Player,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiState {
    pub selected_panel: Panel,
    pub help_visible: bool,
}

/// Everything the views can observe.
#[derive(Debug, Clone, Default)]
pub struct ApplicationState {
    pub current_video: Option<VideoDescriptor>,
    pub video_library: Vec<VideoDescriptor>,
    pub trim_range: TrimRange,
    pub playback: PlaybackState,
    pub export_settings: ExportSettings,
    pub export_progress: ExportProgress,
    pub ui: UiState,
}
