// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration.
//!
//! Range-checked values reuse the bounds of their domain newtypes so the
//! config file and the runtime agree on limits.

use crate::domain::newtypes::{buffer_capacity_bounds, concurrency_bounds, jpeg_quality_bounds};

// ==========================================================================
// Thumbnail Defaults
// ==========================================================================

/// Thumbnail canvas width in pixels.
pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 320;

/// Thumbnail canvas height in pixels.
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 180;

/// Smallest accepted canvas edge.
pub const MIN_THUMBNAIL_EDGE: u32 = 16;

/// Largest accepted canvas edge.
pub const MAX_THUMBNAIL_EDGE: u32 = 1920;

pub const DEFAULT_JPEG_QUALITY: u8 = jpeg_quality_bounds::DEFAULT;

/// Clips processed together in one batch.
pub const DEFAULT_MAX_CONCURRENT: usize = concurrency_bounds::DEFAULT;

/// Per-clip time limit in seconds.
pub const DEFAULT_THUMBNAIL_TIMEOUT_SECS: u64 = 10;

/// Minimum per-clip time limit.
pub const MIN_THUMBNAIL_TIMEOUT_SECS: u64 = 1;

/// Maximum per-clip time limit.
pub const MAX_THUMBNAIL_TIMEOUT_SECS: u64 = 120;

/// Preferred capture position in seconds.
pub const DEFAULT_CAPTURE_AT_SECS: f64 = 1.0;

// ==========================================================================
// Library Defaults
// ==========================================================================

pub const DEFAULT_LIBRARY_EXTENSIONS: &[&str] = crate::media::DEFAULT_VIDEO_EXTENSIONS;

// ==========================================================================
// Export Defaults
// ==========================================================================

/// Delay between two simulated export steps.
pub const DEFAULT_PROGRESS_STEP_MS: u64 = 200;

/// Longest accepted step delay.
pub const MAX_PROGRESS_STEP_MS: u64 = 5_000;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = buffer_capacity_bounds::DEFAULT;
