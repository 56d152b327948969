// SPDX-License-Identifier: MPL-2.0
//! Bounded storage for collected events.

use std::collections::VecDeque;

use super::{DiagnosticEvent, DiagnosticEventKind, WarningType};
use crate::domain::BufferCapacity;

/// The most recent diagnostic events, oldest first.
///
/// Once full, each new event pushes out the oldest one. The number of events
/// pushed out is kept so a report can say how much history it is missing.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<DiagnosticEvent>,
    capacity: usize,
    evicted: u64,
}

impl EventLog {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let capacity = capacity.value();
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    pub fn record(&mut self, event: DiagnosticEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events pushed out since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// Stored warnings of one category.
    #[must_use]
    pub fn count_warnings(&self, warning_type: WarningType) -> usize {
        self.events
            .iter()
            .filter(|event| {
                matches!(&event.kind, DiagnosticEventKind::Warning { warning_type: t, .. } if *t == warning_type)
            })
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.evicted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::newtypes::buffer_capacity_bounds;

    fn warning(message: &str) -> DiagnosticEvent {
        DiagnosticEvent::new(DiagnosticEventKind::Warning {
            warning_type: WarningType::ThumbnailFailed,
            message: message.to_string(),
        })
    }

    fn message(event: &DiagnosticEvent) -> &str {
        match &event.kind {
            DiagnosticEventKind::Warning { message, .. } => message,
            _ => "",
        }
    }

    #[test]
    fn full_log_evicts_oldest_and_counts_it() {
        let mut log = EventLog::new(BufferCapacity::new(buffer_capacity_bounds::MIN));
        for i in 0..buffer_capacity_bounds::MIN + 2 {
            log.record(warning(&format!("clip {i}")));
        }

        assert_eq!(log.len(), buffer_capacity_bounds::MIN);
        assert_eq!(log.evicted(), 2);
        assert_eq!(log.iter().next().map(message), Some("clip 2"));
        assert_eq!(
            log.count_warnings(WarningType::ThumbnailFailed),
            buffer_capacity_bounds::MIN
        );
    }

    #[test]
    fn nothing_is_evicted_below_capacity() {
        let mut log = EventLog::new(BufferCapacity::default());
        log.record(warning("a"));
        log.record(warning("b"));
        assert_eq!(log.evicted(), 0);
        assert_eq!(log.count_warnings(WarningType::LargeFile), 0);
    }

    #[test]
    fn clear_resets_the_eviction_count() {
        let mut log = EventLog::new(BufferCapacity::new(0));
        assert_eq!(log.capacity(), buffer_capacity_bounds::MIN);
        for _ in 0..=log.capacity() {
            log.record(warning("x"));
        }
        assert_eq!(log.evicted(), 1);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.evicted(), 0);
    }
}
