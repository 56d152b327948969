// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business rules with no infrastructure dependencies.
//!
//! This module contains pure value objects and policies. Nothing here
//! touches the filesystem, FFmpeg or the async runtime, which keeps every
//! rule testable in isolation.
//!
//! # Modules
//!
//! - [`export`]: Export quality/format factors and the size estimate
//! - [`frame`]: Decoded frames ([`RawFrame`](frame::RawFrame)) and
//!   [`VideoMetadata`](frame::VideoMetadata)
//! - [`newtypes`]: Range-checked values ([`Volume`](newtypes::Volume),
//!   [`ConcurrencyLimit`](newtypes::ConcurrencyLimit), ...)
//! - [`size_tier`]: File-size tiering policy

pub mod export;
pub mod frame;
pub mod newtypes;
pub mod size_tier;

pub use export::{estimate_export_size, ExportFormat, ExportQuality};
pub use frame::{RawFrame, VideoMetadata};
pub use newtypes::{BufferCapacity, ConcurrencyLimit, JpegQuality, ProgressPercent, Volume};
pub use size_tier::{classify, SizeClass, SizeTier};
