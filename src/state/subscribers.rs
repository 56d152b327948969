// SPDX-License-Identifier: MPL-2.0
//! Per-field subscriber registry.

use std::collections::HashMap;
use std::fmt;

use super::app_state::{
    ApplicationState, ExportProgress, ExportSettings, PlaybackState, TrimRange, UiState,
};
use crate::error::Result;
use crate::media::VideoDescriptor;

/// A top-level state attribute that can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CurrentVideo,
    VideoLibrary,
    TrimRange,
    Playback,
    ExportSettings,
    ExportProgress,
    Ui,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::CurrentVideo,
        Field::VideoLibrary,
        Field::TrimRange,
        Field::Playback,
        Field::ExportSettings,
        Field::ExportProgress,
        Field::Ui,
    ];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::CurrentVideo => "currentVideo",
            Field::VideoLibrary => "videoLibrary",
            Field::TrimRange => "trimRange",
            Field::Playback => "playback",
            Field::ExportSettings => "exportSettings",
            Field::ExportProgress => "exportProgress",
            Field::Ui => "ui",
        };
        f.write_str(name)
    }
}

/// Post-mutation value of one field, borrowed from the state.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    CurrentVideo(Option<&'a VideoDescriptor>),
    VideoLibrary(&'a [VideoDescriptor]),
    TrimRange(&'a TrimRange),
    Playback(&'a PlaybackState),
    ExportSettings(&'a ExportSettings),
    ExportProgress(&'a ExportProgress),
    Ui(&'a UiState),
}

impl<'a> FieldValue<'a> {
    /// Reads `field` out of `state`.
    #[must_use]
    pub fn of(state: &'a ApplicationState, field: Field) -> Self {
        match field {
            Field::CurrentVideo => FieldValue::CurrentVideo(state.current_video.as_ref()),
            Field::VideoLibrary => FieldValue::VideoLibrary(&state.video_library),
            Field::TrimRange => FieldValue::TrimRange(&state.trim_range),
            Field::Playback => FieldValue::Playback(&state.playback),
            Field::ExportSettings => FieldValue::ExportSettings(&state.export_settings),
            Field::ExportProgress => FieldValue::ExportProgress(&state.export_progress),
            Field::Ui => FieldValue::Ui(&state.ui),
        }
    }

    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            FieldValue::CurrentVideo(_) => Field::CurrentVideo,
            FieldValue::VideoLibrary(_) => Field::VideoLibrary,
            FieldValue::TrimRange(_) => Field::TrimRange,
            FieldValue::Playback(_) => Field::Playback,
            FieldValue::ExportSettings(_) => Field::ExportSettings,
            FieldValue::ExportProgress(_) => Field::ExportProgress,
            FieldValue::Ui(_) => Field::Ui,
        }
    }

    #[must_use]
    pub fn as_current_video(&self) -> Option<&'a VideoDescriptor> {
        match *self {
            FieldValue::CurrentVideo(video) => video,
            _ => None,
        }
    }

    #[must_use]
    pub fn as_video_library(&self) -> Option<&'a [VideoDescriptor]> {
        match *self {
            FieldValue::VideoLibrary(videos) => Some(videos),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_trim_range(&self) -> Option<&'a TrimRange> {
        match *self {
            FieldValue::TrimRange(range) => Some(range),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_playback(&self) -> Option<&'a PlaybackState> {
        match *self {
            FieldValue::Playback(playback) => Some(playback),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_export_settings(&self) -> Option<&'a ExportSettings> {
        match *self {
            FieldValue::ExportSettings(settings) => Some(settings),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_export_progress(&self) -> Option<&'a ExportProgress> {
        match *self {
            FieldValue::ExportProgress(progress) => Some(progress),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ui(&self) -> Option<&'a UiState> {
        match *self {
            FieldValue::Ui(ui) => Some(ui),
            _ => None,
        }
    }
}

/// Observer invoked with the new value of its field.
///
/// Returning an error stops the remaining notifications for that mutation.
pub type Callback = Box<dyn FnMut(&FieldValue<'_>) -> Result<()>>;

/// Handle returned by [`SubscriberRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    field: Field,
    id: u64,
}

impl SubscriptionId {
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }
}

/// Callbacks per field, kept in subscription order.
#[derive(Default)]
pub struct SubscriberRegistry {
    next_id: u64,
    callbacks: HashMap<Field, Vec<(u64, Callback)>>,
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<Field, usize> = self
            .callbacks
            .iter()
            .map(|(field, list)| (*field, list.len()))
            .collect();
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &counts)
            .finish()
    }
}

impl SubscriberRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, field: Field, callback: Callback) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.entry(field).or_default().push((id, callback));
        SubscriptionId { field, id }
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let Some(list) = self.callbacks.get_mut(&subscription.field) else {
            return false;
        };
        let before = list.len();
        list.retain(|(id, _)| *id != subscription.id);
        list.len() != before
    }

    /// Invokes the callbacks of `value`'s field in subscription order.
    ///
    /// # Errors
    ///
    /// Returns the first callback error; later callbacks are skipped.
    pub fn dispatch(&mut self, value: &FieldValue<'_>) -> Result<()> {
        if let Some(list) = self.callbacks.get_mut(&value.field()) {
            for (_, callback) in list.iter_mut() {
                callback(value)?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn subscriber_count(&self, field: Field) -> usize {
        self.callbacks.get(&field).map_or(0, Vec::len)
    }
}
