// SPDX-License-Identifier: MPL-2.0
//! Range-checked value objects.
//!
//! Each newtype clamps on construction so an out-of-range value can never
//! reach the store or the thumbnail pipeline.

// =============================================================================
// Volume
// =============================================================================

/// Volume bounds (0.0 to 1.0, where 1.0 = 100%).
pub mod volume_bounds {
    /// Minimum volume level.
    pub const MIN: f32 = 0.0;
    /// Maximum volume level.
    pub const MAX: f32 = 1.0;
    /// Default volume level.
    pub const DEFAULT: f32 = 1.0;
}

/// Playback volume, guaranteed to be within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a new volume level, clamping to valid range.
    ///
    /// NaN maps to the minimum.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            return Self(volume_bounds::MIN);
        }
        Self(volume.clamp(volume_bounds::MIN, volume_bounds::MAX))
    }

    /// Returns the volume value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if volume is effectively muted.
    #[must_use]
    pub fn is_muted(self) -> bool {
        self.0 < 0.001
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(volume_bounds::DEFAULT)
    }
}

// =============================================================================
// ProgressPercent
// =============================================================================

/// Export progress in whole percent, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ProgressPercent(u8);

impl ProgressPercent {
    /// Progress of a finished export.
    pub const COMPLETE: Self = Self(100);

    /// Creates a progress value, clamping anything above 100.
    #[must_use]
    pub fn new(percent: u32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self(percent.min(100) as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

// =============================================================================
// ConcurrencyLimit
// =============================================================================

/// Bounds for the number of thumbnails extracted at the same time.
pub mod concurrency_bounds {
    pub const MIN: usize = 1;
    pub const MAX: usize = 16;
    /// At most three decode contexts are open at once by default.
    pub const DEFAULT: usize = 3;
}

/// Batch size of the thumbnail pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimit(usize);

impl ConcurrencyLimit {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(concurrency_bounds::MIN, concurrency_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for ConcurrencyLimit {
    fn default() -> Self {
        Self(concurrency_bounds::DEFAULT)
    }
}

// =============================================================================
// JpegQuality
// =============================================================================

/// Bounds for thumbnail JPEG quality.
pub mod jpeg_quality_bounds {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    /// Matches a 0.8 encoder quality factor.
    pub const DEFAULT: u8 = 80;
}

/// JPEG encoder quality, `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegQuality(u8);

impl JpegQuality {
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(jpeg_quality_bounds::MIN, jpeg_quality_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(jpeg_quality_bounds::DEFAULT)
    }
}

// =============================================================================
// BufferCapacity
// =============================================================================

/// Diagnostics buffer bounds (events kept in memory).
pub mod buffer_capacity_bounds {
    pub const MIN: usize = 50;
    pub const MAX: usize = 5000;
    pub const DEFAULT: usize = 500;
}

/// Capacity of the diagnostics ring buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_clamps_to_unit_range() {
        assert_eq!(Volume::new(-0.5).value(), 0.0);
        assert_eq!(Volume::new(1.7).value(), 1.0);
        assert_eq!(Volume::new(0.25).value(), 0.25);
        assert_eq!(Volume::new(f32::NAN).value(), 0.0);
    }

    #[test]
    fn volume_default_is_full() {
        assert_eq!(Volume::default().value(), 1.0);
        assert!(Volume::new(0.0).is_muted());
    }

    #[test]
    fn progress_clamps_above_hundred() {
        assert_eq!(ProgressPercent::new(250).value(), 100);
        assert!(ProgressPercent::new(100).is_complete());
        assert!(!ProgressPercent::new(90).is_complete());
        assert_eq!(ProgressPercent::default().value(), 0);
    }

    #[test]
    fn concurrency_limit_default_and_bounds() {
        assert_eq!(ConcurrencyLimit::default().value(), 3);
        assert_eq!(ConcurrencyLimit::new(0).value(), concurrency_bounds::MIN);
        assert_eq!(ConcurrencyLimit::new(64).value(), concurrency_bounds::MAX);
    }

    #[test]
    fn jpeg_quality_bounds_apply() {
        assert_eq!(JpegQuality::default().value(), 80);
        assert_eq!(JpegQuality::new(0).value(), 1);
        assert_eq!(JpegQuality::new(255).value(), 100);
    }

    #[test]
    fn buffer_capacity_clamps() {
        assert_eq!(BufferCapacity::new(0).value(), buffer_capacity_bounds::MIN);
        assert_eq!(
            BufferCapacity::new(100_000).value(),
            buffer_capacity_bounds::MAX
        );
        assert_eq!(
            BufferCapacity::default().value(),
            buffer_capacity_bounds::DEFAULT
        );
    }
}
