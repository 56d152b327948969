// SPDX-License-Identifier: MPL-2.0
//! Application context.
//!
//! [`Session`] owns the store and the services acting on it, and turns their
//! outcomes into notifications and diagnostics. Store callbacks are not
//! `Send`, so a session lives on one thread; drive its futures with
//! `block_on` or a current-thread runtime.

pub mod config;
pub mod paths;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::application::port::FrameSource;
use crate::diagnostics::{
    AppOperation, DiagnosticsCollector, DiagnosticsHandle, ErrorType, UserAction, WarningType,
};
use crate::domain::SizeTier;
use crate::error::{Error, Result};
use crate::media::{
    scan_directory, ExportSummary, ThumbnailGenerator, VideoDescriptor, VideoProcessor,
};
use crate::notifications::{Inbox, Notification};
use crate::state::{Field, Store, SubscriptionId};
use config::Config;

/// Outcome of [`Session::select_video`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The clip is now current.
    Selected,
    /// The clip is too large to open.
    Blocked,
    /// A large clip was not confirmed.
    Declined,
}

/// Store, services and user feedback for one run of the application.
pub struct Session {
    store: Store,
    thumbnails: ThumbnailGenerator,
    processor: VideoProcessor,
    notifications: Rc<RefCell<Inbox>>,
    diagnostics: DiagnosticsCollector,
    handle: DiagnosticsHandle,
    config: Config,
    library_dir: Option<PathBuf>,
    _export_watch: SubscriptionId,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("library_dir", &self.library_dir)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Builds a session reading frames through `source`.
    pub fn new(config: Config, source: Arc<dyn FrameSource>) -> Self {
        let diagnostics = DiagnosticsCollector::new(config.diagnostics_capacity());
        let handle = diagnostics.handle();

        let notifications = Rc::new(RefCell::new(Inbox::with_diagnostics(handle.clone())));

        let mut store = Store::with_export_defaults(
            config.export.default_quality.unwrap_or_default(),
            config.export.default_format.unwrap_or_default(),
        );
        let sink = Rc::clone(&notifications);
        let export_watch = store.subscribe(Field::ExportProgress, move |value| {
            if let Some(progress) = value.as_export_progress() {
                if !progress.is_exporting && progress.progress.is_complete() {
                    sink.borrow_mut()
                        .push(Notification::success("Video exported successfully!"));
                }
            }
            Ok(())
        });

        let thumbnails =
            ThumbnailGenerator::new(source, config.thumbnail_settings(), handle.clone());
        let processor = VideoProcessor::new(config.progress_step_delay(), handle.clone());

        Self {
            store,
            thumbnails,
            processor,
            notifications,
            diagnostics,
            handle,
            config,
            library_dir: None,
            _export_watch: export_watch,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn thumbnails(&self) -> &ThumbnailGenerator {
        &self.thumbnails
    }

    /// Directory of the last successful [`open_library`](Self::open_library).
    #[must_use]
    pub fn library_dir(&self) -> Option<&Path> {
        self.library_dir.as_deref()
    }

    /// Pending notifications, also fed by store callbacks.
    #[must_use]
    pub fn notifications(&self) -> Rc<RefCell<Inbox>> {
        Rc::clone(&self.notifications)
    }

    pub fn diagnostics_handle(&self) -> DiagnosticsHandle {
        self.handle.clone()
    }

    /// Collector with every event logged so far.
    pub fn diagnostics(&mut self) -> &DiagnosticsCollector {
        self.diagnostics.process_pending();
        &self.diagnostics
    }

    pub fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    /// Scans `directory`, generates thumbnails and replaces the library.
    ///
    /// `on_progress(completed, total)` follows the thumbnail pipeline.
    /// Returns the number of clips found.
    ///
    /// # Errors
    ///
    /// Access errors are shown as an error notification and returned; so are
    /// subscriber errors from the library update.
    pub async fn open_library<F>(&mut self, directory: &Path, on_progress: F) -> Result<usize>
    where
        F: FnMut(usize, usize),
    {
        self.handle.log_action(UserAction::ScanLibrary);
        let started = Instant::now();
        let extensions = self.config.library_extensions();

        let report = match scan_directory(directory, &extensions) {
            Ok(report) => report,
            Err(err) => {
                let error_type = match &err {
                    Error::Access(crate::error::AccessError::PermissionDenied(_)) => {
                        ErrorType::PermissionDenied
                    }
                    _ => ErrorType::ScanFailed,
                };
                self.notify(Notification::error(err.to_string()).with_error_type(error_type));
                return Err(err);
            }
        };

        for (path, reason) in &report.skipped {
            self.handle.log_warning(
                WarningType::SkippedEntry,
                format!("{}: {reason}", path.display()),
            );
        }
        self.handle.log_operation(AppOperation::ScanDirectory {
            found: report.videos.len(),
            skipped: report.skipped.len(),
            duration_ms: elapsed_ms(started),
        });

        if report.videos.is_empty() {
            self.notify(
                Notification::warning(format!("No videos found in {}", directory.display()))
                    .with_warning_type(WarningType::NoVideosFound),
            );
        }

        let videos = self
            .thumbnails
            .generate_thumbnails_for_videos(report.videos, on_progress)
            .await;
        let count = videos.len();
        self.store.add_videos_to_library(videos)?;
        self.library_dir = Some(directory.to_path_buf());
        Ok(count)
    }

    /// Opens the library entry at `index`.
    ///
    /// BLOCKED clips are refused with a warning. WARNING clips are opened
    /// only when `confirm` accepts them. Clips whose duration is unknown are
    /// probed first.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`](crate::error::StoreError::IndexOutOfRange)
    /// or any subscriber error.
    pub async fn select_video<C>(&mut self, index: usize, confirm: C) -> Result<Selection>
    where
        C: FnOnce(&VideoDescriptor) -> bool,
    {
        let mut video = self
            .store
            .state()
            .video_library
            .get(index)
            .cloned()
            .ok_or(crate::error::StoreError::IndexOutOfRange(index))?;

        match video.tier() {
            SizeTier::Blocked => {
                self.notify(
                    Notification::warning(format!(
                        "File too large: {} is {}, exceeding the 500 MB limit",
                        video.name, video.size_formatted
                    ))
                    .with_warning_type(WarningType::LargeFile),
                );
                return Ok(Selection::Blocked);
            }
            SizeTier::Warning => {
                self.notify(
                    Notification::warning(format!(
                        "Large file: {} is {}, processing may be slow",
                        video.name, video.size_formatted
                    ))
                    .with_warning_type(WarningType::LargeFile),
                );
                if !confirm(&video) {
                    self.handle.log_action(UserAction::DeclineLargeVideo);
                    return Ok(Selection::Declined);
                }
            }
            SizeTier::Safe => {}
        }

        if !video.is_probed() && self.thumbnails.probe_metadata(&mut video).await {
            let mut library = self.store.state().video_library.clone();
            if let Some(slot) = library.get_mut(index) {
                *slot = video.clone();
            }
            self.store.add_videos_to_library(library)?;
        }

        self.handle.log_action(UserAction::SelectVideo {
            tier: video.tier().label().to_string(),
        });
        self.store.set_current_video(Some(video))?;
        Ok(Selection::Selected)
    }

    /// Moves the trim range of the current clip.
    ///
    /// # Errors
    ///
    /// See [`Store::set_trim_range`].
    pub fn set_trim_range(&mut self, start_ms: f64, end_ms: f64) -> Result<()> {
        self.handle
            .log_action(UserAction::SetTrimRange { start_ms, end_ms });
        self.store.set_trim_range(start_ms, end_ms)
    }

    /// Runs the export of the current clip.
    ///
    /// # Errors
    ///
    /// Failures are shown as an error notification and returned.
    pub async fn export(&mut self) -> Result<ExportSummary> {
        match self.processor.export(&mut self.store).await {
            Ok(summary) => Ok(summary),
            Err(err) => {
                self.notify(
                    Notification::error(format!("Export failed: {err}"))
                        .with_error_type(ErrorType::ExportFailed),
                );
                Err(err)
            }
        }
    }

    /// Shows an unexpected failure to the user.
    pub fn report_unexpected(&self, err: &Error) {
        self.notify(
            Notification::error(format!("An error occurred: {err}"))
                .with_error_type(ErrorType::Unexpected),
        );
    }

    /// Writes the diagnostics report as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export_diagnostics(&mut self, path: &Path) -> Result<PathBuf> {
        self.diagnostics.process_pending();
        self.diagnostics.export_to_file(path)
    }
}

#[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
