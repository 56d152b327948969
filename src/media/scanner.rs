// SPDX-License-Identifier: MPL-2.0
//! Directory scanner for building the clip library.
//!
//! Scans one directory (not recursive) for files with a supported video
//! extension, classifies each by size and returns them newest first.

use crate::error::{AccessError, Error, Result};
use crate::media::descriptor::VideoDescriptor;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Extensions accepted when no configuration overrides them.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mp4"];

/// Result of a directory scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Descriptors sorted by last modification, newest first.
    pub videos: Vec<VideoDescriptor>,
    /// Matching entries that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Scans `directory` for videos whose extension is in `extensions`.
///
/// Extension matching is case-insensitive. Entries that match but cannot be
/// read are reported in [`ScanReport::skipped`] instead of failing the scan.
///
/// # Errors
///
/// Returns [`Error::Access`] when the directory does not exist, is not a
/// directory, or cannot be listed.
pub fn scan_directory<S: AsRef<str>>(directory: &Path, extensions: &[S]) -> Result<ScanReport> {
    let dir_meta = std::fs::metadata(directory).map_err(|e| access_or_io(&e, directory))?;
    if !dir_meta.is_dir() {
        return Err(AccessError::NotADirectory(directory.to_path_buf()).into());
    }

    let entries = std::fs::read_dir(directory).map_err(|e| access_or_io(&e, directory))?;

    let mut report = ScanReport::default();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report.skipped.push((directory.to_path_buf(), err.to_string()));
                continue;
            }
        };
        let path = entry.path();
        if !has_video_extension(&path, extensions) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) if meta.is_file() => {
                let modified = meta.modified().ok().map(DateTime::<Utc>::from);
                report
                    .videos
                    .push(VideoDescriptor::new(path, meta.len(), modified));
            }
            Ok(_) => {}
            Err(err) => report.skipped.push((path, err.to_string())),
        }
    }

    sort_newest_first(&mut report.videos);
    Ok(report)
}

/// Checks whether `path` ends with one of `extensions` (case-insensitive).
pub fn has_video_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(ext))
        })
}

/// Newest first; files without a timestamp go last, ties ordered by name.
fn sort_newest_first(videos: &mut [VideoDescriptor]) {
    videos.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn access_or_io(err: &std::io::Error, path: &Path) -> Error {
    match AccessError::from_io(err, path) {
        Some(access) => Error::Access(access),
        None => Error::Io(format!("{}: {err}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn create_test_video(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("failed to create test file");
        file.write_all(b"fake video data")
            .expect("failed to write test file");
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .expect("failed to set mtime");
        path
    }

    #[test]
    fn scan_keeps_only_matching_extensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_video(temp_dir.path(), "a.mp4", 10);
        create_test_video(temp_dir.path(), "b.MP4", 20);
        create_test_video(temp_dir.path(), "c.mov", 30);
        create_test_video(temp_dir.path(), "notes.txt", 40);

        let report = scan_directory(temp_dir.path(), DEFAULT_VIDEO_EXTENSIONS)
            .expect("failed to scan directory");

        let names: Vec<_> = report.videos.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["a.mp4", "b.MP4"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn scan_sorts_newest_first() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_video(temp_dir.path(), "old.mp4", 3_600);
        create_test_video(temp_dir.path(), "new.mp4", 5);
        create_test_video(temp_dir.path(), "mid.mp4", 600);

        let report = scan_directory(temp_dir.path(), &["mp4"]).expect("scan");

        let names: Vec<_> = report.videos.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["new.mp4", "mid.mp4", "old.mp4"]);
    }

    #[test]
    fn scan_fills_size_and_tier() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        create_test_video(temp_dir.path(), "clip.mp4", 1);

        let report = scan_directory(temp_dir.path(), &["mp4"]).expect("scan");
        let clip = &report.videos[0];

        assert_eq!(clip.size, 15);
        assert_eq!(clip.size_formatted, "15 B");
        assert!(clip.can_load());
        assert!(clip.last_modified.is_some());
        assert_eq!(clip.duration_ms, 0.0);
    }

    #[test]
    fn scan_ignores_directories_named_like_videos() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::create_dir(temp_dir.path().join("folder.mp4")).expect("mkdir");

        let report = scan_directory(temp_dir.path(), &["mp4"]).expect("scan");
        assert!(report.videos.is_empty());
    }

    #[test]
    fn missing_directory_is_access_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing = temp_dir.path().join("nope");

        let err = scan_directory(&missing, &["mp4"]).expect_err("should fail");
        assert!(matches!(err, Error::Access(AccessError::NotFound(p)) if p == missing));
    }

    #[test]
    fn file_instead_of_directory_is_rejected() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let file = create_test_video(temp_dir.path(), "a.mp4", 1);

        let err = scan_directory(&file, &["mp4"]).expect_err("should fail");
        assert!(matches!(err, Error::Access(AccessError::NotADirectory(_))));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_video_extension(Path::new("x.Mp4"), &["mp4"]));
        assert!(!has_video_extension(Path::new("mp4"), &["mp4"]));
        assert!(!has_video_extension(Path::new("x.mp4.part"), &["mp4"]));
    }
}
