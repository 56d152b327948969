// SPDX-License-Identifier: MPL-2.0
//! Clip discovery, thumbnails and export.
//!
//! - [`scanner`]: Builds descriptors from a directory listing
//! - [`descriptor`]: Per-clip metadata and encoded thumbnail
//! - [`thumbnail`]: Batch thumbnail pipeline
//! - [`export`]: Simulated export flow

pub mod descriptor;
pub mod export;
pub mod scanner;
pub mod thumbnail;

pub use descriptor::{Thumbnail, VideoDescriptor};
pub use export::{ExportSummary, VideoProcessor};
pub use scanner::{scan_directory, ScanReport, DEFAULT_VIDEO_EXTENSIONS};
pub use thumbnail::{placeholder, ThumbnailGenerator, ThumbnailSettings};
