// SPDX-License-Identifier: MPL-2.0
//! Simulated export.
//!
//! Drives the export progress fields of the store through a fixed sequence of
//! steps. No transcoding is performed; the summary names the file an encoder
//! would produce.

use std::time::{Duration, Instant};

use crate::diagnostics::{AppOperation, DiagnosticsHandle, ErrorType, UserAction};
use crate::domain::{ExportFormat, ExportQuality};
use crate::error::{Result, StoreError};
use crate::state::Store;

/// Percent added per progress step.
pub const PROGRESS_STEP_PERCENT: u32 = 10;

/// Outcome of a finished export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub file_name: String,
    pub quality: ExportQuality,
    pub format: ExportFormat,
    /// Estimated output size in bytes.
    pub estimated_size: u64,
    /// Length of the exported range in milliseconds.
    pub duration_ms: f64,
}

/// Runs exports against a [`Store`].
#[derive(Debug, Clone)]
pub struct VideoProcessor {
    step_delay: Duration,
    diagnostics: DiagnosticsHandle,
}

impl VideoProcessor {
    pub fn new(step_delay: Duration, diagnostics: DiagnosticsHandle) -> Self {
        Self {
            step_delay,
            diagnostics,
        }
    }

    /// Exports the trimmed range of the current clip.
    ///
    /// Progress goes 0, 10, ... 100 with status `"Processing... N%"`, waiting
    /// `step_delay` after each step, then the export is marked complete.
    ///
    /// # Errors
    ///
    /// [`StoreError::NoCurrentVideo`] without a selection,
    /// [`StoreError::ExportInProgress`] while another export runs, or any
    /// subscriber error. After a subscriber error the export is aborted, so
    /// the store no longer reports one in progress.
    pub async fn export(&self, store: &mut Store) -> Result<ExportSummary> {
        let state = store.state();
        let video = state
            .current_video
            .as_ref()
            .ok_or(StoreError::NoCurrentVideo)?;
        if state.export_progress.is_exporting {
            return Err(StoreError::ExportInProgress.into());
        }

        let settings = state.export_settings;
        let summary = ExportSummary {
            file_name: output_file_name(&video.name, settings.format),
            quality: settings.quality,
            format: settings.format,
            estimated_size: settings.estimated_size,
            duration_ms: state.trim_range.len_ms(),
        };

        self.diagnostics.log_action_with_details(
            UserAction::StartExport,
            Some(summary.file_name.clone()),
        );
        let started = Instant::now();

        if let Err(err) = self.run_steps(store).await {
            if let Err(abort_err) = store.abort_export(format!("Export failed: {err}")) {
                self.diagnostics
                    .log_error(ErrorType::ExportFailed, abort_err.to_string());
            }
            return Err(err);
        }

        #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
        let duration_ms = started.elapsed().as_millis() as u64;
        self.diagnostics.log_operation(AppOperation::Export {
            format: summary.format,
            quality: summary.quality,
            duration_ms,
        });

        Ok(summary)
    }

    async fn run_steps(&self, store: &mut Store) -> Result<()> {
        store.start_export()?;
        for percent in (0..=100).step_by(PROGRESS_STEP_PERCENT as usize) {
            store.set_export_progress(percent, format!("Processing... {percent}%"))?;
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
        }
        store.complete_export()
    }
}

/// `clip.mp4` exported as GIF becomes `clip_trimmed.gif`.
#[must_use]
pub fn output_file_name(source_name: &str, format: ExportFormat) -> String {
    let stem = source_name
        .rsplit_once('.')
        .map_or(source_name, |(stem, _)| stem);
    format!("{stem}_trimmed.{}", format.extension())
}
