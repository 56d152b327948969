// SPDX-License-Identifier: MPL-2.0
//! Human-readable formatting for sizes and timestamps shown next to clips.

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Formats a byte count with binary thresholds.
///
/// Below 1 KiB the raw count is shown; KB and MB use one decimal place,
/// GB uses two.
///
/// # Examples
///
/// ```
/// use clipcut::format::format_file_size;
///
/// assert_eq!(format_file_size(512), "512 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.2} GB", bytes as f64 / GIB as f64)
    }
}

/// Formats milliseconds as `M:SS`.
///
/// Minutes are not padded and keep growing past 59; negative or non-finite
/// input is shown as `0:00`.
///
/// # Examples
///
/// ```
/// use clipcut::format::format_time;
///
/// assert_eq!(format_time(125_000.0), "2:05");
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn format_time(ms: f64) -> String {
    let total_seconds = if ms.is_finite() && ms > 0.0 {
        (ms / 1000.0).floor() as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}
