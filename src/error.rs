// SPDX-License-Identifier: MPL-2.0
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Video(VideoError),
    Access(AccessError),
    Store(StoreError),
    /// A state subscriber aborted the notification chain.
    Subscriber(String),
}

/// Specific error types for media decoding issues.
///
/// Used to give the user a precise reason when a clip cannot be previewed
/// or a thumbnail could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoError {
    /// File format is not supported (e.g., unknown extension)
    UnsupportedFormat,

    /// File exists but contains no video stream
    NoVideoStream,

    /// File appears corrupted or has invalid data
    CorruptedFile,

    /// Decoding or seeking failed
    DecodingFailed(String),

    /// Extraction did not finish within the allotted time
    Timeout,

    /// I/O error (file not found, permission denied, etc.)
    IoError(String),

    /// Generic error with raw message
    Other(String),
}

impl VideoError {
    /// Attempts to parse a raw error message into a specific VideoError type.
    /// This is used to categorize errors from FFmpeg/decoder.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("no such file")
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream") || msg_lower.contains("no video track") {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid data")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scal")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
            || msg_lower.contains("codec")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        if msg_lower.contains("timed out") || msg_lower.contains("timeout") {
            return VideoError::Timeout;
        }

        VideoError::Other(msg.to_string())
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::UnsupportedFormat => write!(f, "Unsupported video format"),
            VideoError::NoVideoStream => write!(f, "No video stream found"),
            VideoError::CorruptedFile => write!(f, "Video file is corrupted"),
            VideoError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            VideoError::Timeout => write!(f, "Thumbnail generation timeout"),
            VideoError::IoError(msg) => write!(f, "I/O error: {}", msg),
            VideoError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Failures to reach the media directory. These block the scan flow and are
/// surfaced to the user until they retry.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    NotADirectory(PathBuf),
}

impl AccessError {
    /// Maps an I/O failure on `path` to an access error when it is one.
    pub fn from_io(err: &std::io::Error, path: &std::path::Path) -> Option<Self> {
        match err.kind() {
            std::io::ErrorKind::NotFound => Some(AccessError::NotFound(path.to_path_buf())),
            std::io::ErrorKind::PermissionDenied => {
                Some(AccessError::PermissionDenied(path.to_path_buf()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::NotFound(path) => write!(f, "Directory not found: {}", path.display()),
            AccessError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            AccessError::NotADirectory(path) => {
                write!(f, "Not a directory: {}", path.display())
            }
        }
    }
}

/// Rejected state mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The descriptor is too large to be opened.
    BlockedVideo(String),
    /// Trim start lies after trim end once both were clamped.
    InvertedTrimRange { start: f64, end: f64 },
    /// No library entry at this index.
    IndexOutOfRange(usize),
    /// The operation needs a current video.
    NoCurrentVideo,
    /// An export is already running.
    ExportInProgress,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::BlockedVideo(name) => write!(f, "File too large to load: {}", name),
            StoreError::InvertedTrimRange { start, end } => {
                write!(f, "Trim start {start} ms is after trim end {end} ms")
            }
            StoreError::IndexOutOfRange(index) => {
                write!(f, "No video at library index {}", index)
            }
            StoreError::NoCurrentVideo => write!(f, "No video selected"),
            StoreError::ExportInProgress => write!(f, "An export is already running"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Video(e) => write!(f, "Video Error: {}", e),
            Error::Access(e) => write!(f, "Access Error: {}", e),
            Error::Store(e) => write!(f, "State Error: {}", e),
            Error::Subscriber(e) => write!(f, "Subscriber Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<VideoError> for Error {
    fn from(err: VideoError) -> Self {
        Error::Video(err)
    }
}

impl From<AccessError> for Error {
    fn from(err: AccessError) -> Self {
        Error::Access(err)
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Video(VideoError::Other(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
