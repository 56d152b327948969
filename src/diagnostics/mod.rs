// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! Events are captured during a session, kept in a bounded [`EventLog`], and
//! can be exported as a JSON report.
//!
//! # Architecture
//!
//! - [`EventLog`]: Most recent events, counting the ones it had to evict
//! - [`DiagnosticEvent`]: Timestamped event with a [`DiagnosticEventKind`]
//! - [`DiagnosticsCollector`]: Owns the buffer and drains the event channel
//! - [`DiagnosticsHandle`]: Cheap, cloneable sender used by the services

mod buffer;
mod collector;
mod events;
mod report;

pub use buffer::EventLog;
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    AppOperation, DiagnosticEvent, DiagnosticEventKind, ErrorType, UserAction, WarningType,
};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
