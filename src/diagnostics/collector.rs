// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! Services log through [`DiagnosticsHandle`]s; the owner of the
//! [`DiagnosticsCollector`] drains the channel with
//! [`DiagnosticsCollector::process_pending`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use super::{
    AppOperation, DiagnosticEvent, DiagnosticEventKind, DiagnosticReport, ErrorType, EventLog,
    ReportMetadata, SerializableEvent, UserAction, WarningType,
};
use crate::domain::BufferCapacity;
use crate::error::Result;

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads.
/// Every method is non-blocking and drops the event if the channel is full.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// A handle whose events go nowhere.
    ///
    /// Useful for services constructed without a collector, such as in tests.
    #[must_use]
    pub fn disconnected() -> Self {
        let (event_tx, _) = bounded(1);
        Self { event_tx }
    }

    pub fn log_action(&self, action: UserAction) {
        self.log_action_with_details(action, None);
    }

    pub fn log_action_with_details(&self, action: UserAction, details: Option<String>) {
        self.send(DiagnosticEventKind::UserAction { action, details });
    }

    pub fn log_info(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Info {
            message: message.into(),
        });
    }

    pub fn log_warning(&self, warning_type: WarningType, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            warning_type,
            message: message.into(),
        });
    }

    pub fn log_error(&self, error_type: ErrorType, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Error {
            error_type,
            message: message.into(),
        });
    }

    pub fn log_operation(&self, operation: AppOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    /// Attempts to send an action, reporting a full or closed channel.
    ///
    /// # Errors
    ///
    /// Returns the rejected event when the channel cannot accept it.
    pub fn try_log_action(&self, action: UserAction) -> std::result::Result<(), TrySendError<DiagnosticEvent>> {
        let event = DiagnosticEvent::new(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
        self.event_tx.try_send(event)
    }

    fn send(&self, kind: DiagnosticEventKind) {
        // Non-blocking send - drop if channel is full or closed
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }
}

/// Central collector for diagnostic events.
///
/// Received events are stored in a bounded [`EventLog`]; old events are
/// evicted once it reaches capacity.
pub struct DiagnosticsCollector {
    events: EventLog,
    event_rx: Receiver<DiagnosticEvent>,
    /// Kept to create handles.
    event_tx: Sender<DiagnosticEvent>,
    /// Monotonic start, for relative event times.
    collection_started_at: Instant,
    /// Wall clock start, for report metadata.
    collection_started_at_utc: DateTime<Utc>,
}

/// Events buffered in the channel between two `process_pending` calls.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            events: EventLog::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every event waiting in the channel into the log.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.events.record(event);
        }
    }

    /// Logs an action directly to the log (bypassing the channel).
    pub fn log_action(&mut self, action: UserAction) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
        self.events.record(event);
    }

    /// Logs an operation directly to the log (bypassing the channel).
    pub fn log_operation(&mut self, operation: AppOperation) {
        let event = DiagnosticEvent::new(DiagnosticEventKind::Operation { operation });
        self.events.record(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates stored events, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    /// Number of stored warnings of the given type.
    #[must_use]
    pub fn count_warnings(&self, warning_type: WarningType) -> usize {
        self.events.count_warnings(warning_type)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    #[must_use]
    pub fn collection_duration(&self) -> std::time::Duration {
        self.collection_started_at.elapsed()
    }

    /// Builds a report from the stored events.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn build_report(&self) -> DiagnosticReport {
        let collection_duration_ms = self.collection_started_at.elapsed().as_millis() as u64;

        let events: Vec<SerializableEvent> = self
            .events
            .iter()
            .map(|event| {
                SerializableEvent::new(
                    event.timestamp,
                    self.collection_started_at,
                    event.kind.clone(),
                )
            })
            .collect();

        let metadata = ReportMetadata::new(
            self.collection_started_at_utc,
            collection_duration_ms,
            events.len(),
            self.events.evicted(),
        );

        DiagnosticReport::new(metadata, events)
    }

    /// Exports all collected events as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the JSON report to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let json = self.export_json()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        Ok(path.to_path_buf())
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
