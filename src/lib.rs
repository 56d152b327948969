// SPDX-License-Identifier: MPL-2.0
//! `clipcut` builds a browsable library of video clips, trims them and
//! estimates the exported size.
//!
//! Clips are scanned from a directory, tiered by file size, and given a
//! letterboxed JPEG thumbnail by a bounded-concurrency batch pipeline. A
//! reactive store holds the editing state and notifies per-field observers.

#![doc(html_root_url = "https://docs.rs/clipcut/0.1.0")]

pub mod app;
pub mod application;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod format;
pub mod infrastructure;
pub mod media;
pub mod notifications;
pub mod state;
