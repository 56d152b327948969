// SPDX-License-Identifier: MPL-2.0
//! User-facing notifications.
//!
//! Messages are collected in an [`Inbox`] as the session runs and handed to
//! the front end in arrival order.

mod inbox;
mod notification;

pub use inbox::Inbox;
pub use notification::{Notification, Severity};
