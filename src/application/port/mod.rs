// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! # Available Ports
//!
//! - [`frame_source`]: Probing containers and grabbing single frames
//!
//! # Design Notes
//!
//! - Traits use domain types only (no `FFmpeg` types leak out)
//! - Traits are `Send + Sync` so one source can serve concurrent requests
//! - Asynchronous methods return boxed futures to keep the traits object safe

pub mod frame_source;

pub use frame_source::{CancelFlag, FrameSource};
