// SPDX-License-Identifier: MPL-2.0
//! Decoded frames and container metadata.

use std::sync::Arc;

/// A decoded video frame as tightly packed RGBA pixels.
///
/// # Example
///
/// ```
/// use clipcut::domain::RawFrame;
///
/// let frame = RawFrame::from_rgba(4, 2, vec![0u8; 4 * 2 * 4]).unwrap();
/// assert_eq!(frame.width(), 4);
/// assert!((frame.aspect_ratio() - 2.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    width: u32,
    height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl RawFrame {
    /// Wraps RGBA pixels.
    ///
    /// Returns `None` when a dimension is zero or the buffer length does not
    /// match `width * height * 4`.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba_bytes: Vec<u8>) -> Option<Self> {
        let expected_len = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || rgba_bytes.len() != expected_len {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba_bytes: Arc::new(rgba_bytes),
        })
    }

    /// A frame filled with a single RGBA color.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Option<Self> {
        let pixels = (width as usize) * (height as usize);
        let bytes = rgba.iter().copied().cycle().take(pixels * 4).collect();
        Self::from_rgba(width, height, bytes)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Container metadata probed from a video file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    /// Video width in pixels.
    pub width: u32,
    /// Video height in pixels.
    pub height: u32,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl VideoMetadata {
    #[must_use]
    pub fn new(width: u32, height: u32, duration_secs: f64) -> Self {
        Self {
            width,
            height,
            duration_secs,
        }
    }

    /// Duration in milliseconds, the unit the store works in.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_secs * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(RawFrame::from_rgba(2, 2, vec![0; 15]).is_none());
        assert!(RawFrame::from_rgba(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn solid_fills_every_pixel() {
        let frame = RawFrame::solid(3, 2, [10, 20, 30, 255]).expect("valid frame");
        assert_eq!(frame.rgba_bytes().len(), 24);
        assert!(frame
            .rgba_bytes()
            .chunks_exact(4)
            .all(|px| px == [10, 20, 30, 255]));
    }

    #[test]
    fn metadata_converts_to_millis() {
        let meta = VideoMetadata::new(1920, 1080, 12.5);
        assert!((meta.duration_ms() - 12_500.0).abs() < f64::EPSILON);
    }
}
