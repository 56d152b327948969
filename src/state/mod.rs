// SPDX-License-Identifier: MPL-2.0
//! Reactive application state.
//!
//! [`Store`] owns the single [`ApplicationState`] of a session. Every mutator
//! applies its change and then synchronously notifies the subscribers of each
//! affected [`Field`], in subscription order.

mod app_state;
mod store;
mod subscribers;

pub use app_state::{
    ApplicationState, ExportProgress, ExportSettings, Panel, PlaybackState, TrimHandle, TrimRange,
    UiState,
};
pub use store::Store;
pub use subscribers::{Callback, Field, FieldValue, SubscriberRegistry, SubscriptionId};
