// SPDX-License-Identifier: MPL-2.0
//! Pending notifications, oldest first.

use std::collections::VecDeque;

use super::notification::{Notification, Severity};
use crate::diagnostics::{DiagnosticsHandle, ErrorType, WarningType};

/// Notifications waiting to be shown.
///
/// Store callbacks push into it while a mutation runs; the front end drains
/// it once the operation is over.
#[derive(Debug, Default)]
pub struct Inbox {
    pending: VecDeque<Notification>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Inbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An inbox that also records warnings and errors in diagnostics.
    #[must_use]
    pub fn with_diagnostics(handle: DiagnosticsHandle) -> Self {
        Self {
            pending: VecDeque::new(),
            diagnostics: Some(handle),
        }
    }

    /// Queues a notification.
    ///
    /// Warnings and errors are logged to diagnostics, with `Other` as the
    /// category when none was set.
    pub fn push(&mut self, notification: Notification) {
        if let Some(handle) = &self.diagnostics {
            match notification.severity() {
                Severity::Warning => handle.log_warning(
                    notification.warning_type().unwrap_or(WarningType::Other),
                    notification.message(),
                ),
                Severity::Error => handle.log_error(
                    notification.error_type().unwrap_or(ErrorType::Other),
                    notification.message(),
                ),
                Severity::Success | Severity::Info => {}
            }
        }
        self.pending.push_back(notification);
    }

    /// Takes every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};

    #[test]
    fn drain_keeps_arrival_order_and_empties() {
        let mut inbox = Inbox::new();
        inbox.push(Notification::info("scanning"));
        inbox.push(Notification::warning("big file"));
        inbox.push(Notification::success("done"));
        assert_eq!(inbox.len(), 3);

        let messages: Vec<_> = inbox
            .drain()
            .iter()
            .map(|n| n.message().to_string())
            .collect();
        assert_eq!(messages, vec!["scanning", "big file", "done"]);
        assert!(inbox.is_empty());
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn warnings_and_errors_are_mirrored_to_diagnostics() {
        let mut collector = DiagnosticsCollector::default();
        let mut inbox = Inbox::with_diagnostics(collector.handle());

        inbox.push(Notification::success("saved"));
        inbox.push(Notification::warning("big file").with_warning_type(WarningType::LargeFile));
        inbox.push(Notification::error("denied"));
        collector.process_pending();

        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(
            &kinds[0],
            DiagnosticEventKind::Warning { warning_type: WarningType::LargeFile, .. }
        ));
        assert!(matches!(
            &kinds[1],
            DiagnosticEventKind::Error { error_type: ErrorType::Other, .. }
        ));
        assert_eq!(inbox.len(), 3);
    }

    #[test]
    fn without_diagnostics_nothing_is_mirrored() {
        let mut inbox = Inbox::new();
        inbox.push(Notification::error("denied"));
        let severities: Vec<_> = inbox.iter().map(Notification::severity).collect();
        assert_eq!(severities, vec![Severity::Error]);
    }
}
