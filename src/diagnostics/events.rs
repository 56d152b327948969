// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::domain::{ExportFormat, ExportQuality};

/// User-initiated actions worth correlating with later failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// Scan a directory for clips.
    ScanLibrary,

    /// Pick a clip from the library.
    SelectVideo {
        /// Size tier label of the picked clip.
        tier: String,
    },

    /// Decline opening a large clip.
    DeclineLargeVideo,

    /// Move the trim range.
    SetTrimRange {
        start_ms: f64,
        end_ms: f64,
    },

    SetExportQuality {
        quality: ExportQuality,
    },

    SetExportFormat {
        format: ExportFormat,
    },

    StartExport,

    ToggleHelp,
}

/// Categories of warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A thumbnail could not be produced for one clip.
    ThumbnailFailed,
    /// Duration or dimensions could not be read.
    MetadataUnavailable,
    /// A clip was refused because of its size.
    LargeFile,
    /// The scanned directory holds no clips.
    NoVideosFound,
    /// A directory entry could not be read during a scan.
    SkippedEntry,
    /// The configuration file could not be used.
    ConfigurationIssue,
    Other,
}

/// Categories of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    PermissionDenied,
    ScanFailed,
    ExportFailed,
    /// Failure that no specific handler caught.
    Unexpected,
    Other,
}

/// Timed operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum AppOperation {
    ScanDirectory {
        found: usize,
        skipped: usize,
        duration_ms: u64,
    },
    GenerateThumbnails {
        total: usize,
        failed: usize,
        duration_ms: u64,
    },
    ProbeMetadata {
        success: bool,
        duration_ms: u64,
    },
    Export {
        format: ExportFormat,
        quality: ExportQuality,
        duration_ms: u64,
    },
}

/// A diagnostic event with the moment it was recorded.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// Monotonic timestamp, used for relative times in reports.
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// The type and associated data for a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        /// Extra context such as a file name.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },

    /// Informational note (e.g. the user cancelled a flow).
    Info { message: String },

    Warning {
        warning_type: WarningType,
        message: String,
    },

    Error {
        error_type: ErrorType,
        message: String,
    },

    Operation { operation: AppOperation },
}
