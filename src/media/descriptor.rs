// SPDX-License-Identifier: MPL-2.0
//! Descriptors for the clips found in the library.

use crate::domain::{classify, SizeClass, SizeTier, VideoMetadata};
use crate::error::Result;
use crate::format::format_file_size;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An encoded thumbnail image.
///
/// The JPEG bytes are shared, so cloning a descriptor never copies the image.
/// The bytes are released when the last descriptor referencing them is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    jpeg: Arc<[u8]>,
}

impl Thumbnail {
    #[must_use]
    pub fn new(width: u32, height: u32, jpeg: Vec<u8>) -> Self {
        Self {
            width,
            height,
            jpeg: Arc::from(jpeg),
        }
    }

    /// The encoded JPEG bytes.
    #[must_use]
    pub fn jpeg_bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// Writes the JPEG to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.jpeg)?;
        Ok(())
    }
}

/// Metadata record for one clip in the library.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDescriptor {
    /// File name including extension.
    pub name: String,
    /// Location of the underlying file.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Size rendered for display (e.g. "12.5 MB").
    pub size_formatted: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// Duration in milliseconds; `0.0` until probed.
    pub duration_ms: f64,
    /// Width in pixels; `0` until probed.
    pub width: u32,
    /// Height in pixels; `0` until probed.
    pub height: u32,
    pub thumbnail: Option<Thumbnail>,
    /// Computed once when the descriptor is created.
    size_class: SizeClass,
}

impl VideoDescriptor {
    /// Creates an unprobed descriptor and classifies its size.
    pub fn new(
        path: impl Into<PathBuf>,
        size: u64,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            path,
            size,
            size_formatted: format_file_size(size),
            last_modified,
            duration_ms: 0.0,
            width: 0,
            height: 0,
            thumbnail: None,
            size_class: classify(size),
        }
    }

    #[must_use]
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    #[must_use]
    pub fn tier(&self) -> SizeTier {
        self.size_class.tier
    }

    #[must_use]
    pub fn can_load(&self) -> bool {
        self.size_class.can_load
    }

    /// True once duration has been read from the container.
    #[must_use]
    pub fn is_probed(&self) -> bool {
        self.duration_ms > 0.0
    }

    /// Records probed container metadata.
    pub fn apply_metadata(&mut self, metadata: &VideoMetadata) {
        self.duration_ms = metadata.duration_ms();
        self.width = metadata.width;
        self.height = metadata.height;
    }

    /// Resolution as `WxH`, or `Unknown` before probing.
    #[must_use]
    pub fn resolution(&self) -> String {
        if self.width == 0 || self.height == 0 {
            "Unknown".to_string()
        } else {
            format!("{}x{}", self.width, self.height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn new_descriptor_is_classified_and_unprobed() {
        let desc = VideoDescriptor::new("/clips/ride.mp4", 250 * MIB, None);
        assert_eq!(desc.name, "ride.mp4");
        assert_eq!(desc.size_formatted, "250.0 MB");
        assert_eq!(desc.tier(), SizeTier::Warning);
        assert!(desc.can_load());
        assert!(!desc.is_probed());
        assert!(desc.thumbnail.is_none());
        assert_eq!(desc.resolution(), "Unknown");
    }

    #[test]
    fn apply_metadata_fills_duration_and_size() {
        let mut desc = VideoDescriptor::new("clip.mp4", 10, None);
        desc.apply_metadata(&VideoMetadata::new(1280, 720, 4.5));
        assert!(desc.is_probed());
        assert!((desc.duration_ms - 4_500.0).abs() < f64::EPSILON);
        assert_eq!(desc.resolution(), "1280x720");
    }

    #[test]
    fn thumbnail_clones_share_bytes() {
        let thumb = Thumbnail::new(2, 2, vec![1, 2, 3]);
        let copy = thumb.clone();
        assert_eq!(copy.jpeg_bytes().as_ptr(), thumb.jpeg_bytes().as_ptr());
    }

    #[test]
    fn thumbnail_write_creates_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("thumbs").join("a.jpg");
        Thumbnail::new(1, 1, vec![0xFF, 0xD8])
            .write_to(&target)
            .expect("write thumbnail");
        assert_eq!(std::fs::read(&target).expect("read back"), vec![0xFF, 0xD8]);
    }
}
