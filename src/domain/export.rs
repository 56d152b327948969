// SPDX-License-Identifier: MPL-2.0
//! Export settings and the output size estimate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compression strength of the exported clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportQuality {
    Light,
    #[default]
    Medium,
    Strong,
}

impl ExportQuality {
    /// Fraction of the source bitrate kept at this quality.
    #[must_use]
    pub fn size_factor(self) -> f64 {
        match self {
            ExportQuality::Light => 0.7,
            ExportQuality::Medium => 0.5,
            ExportQuality::Strong => 0.3,
        }
    }
}

/// Container of the exported clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    #[default]
    Mp4,
    Gif,
}

impl ExportFormat {
    /// GIFs are typically much larger than MP4 for the same clip.
    #[must_use]
    pub fn size_factor(self) -> f64 {
        match self {
            ExportFormat::Mp4 => 1.0,
            ExportFormat::Gif => 2.5,
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Mp4 => "mp4",
            ExportFormat::Gif => "gif",
        }
    }
}

impl fmt::Display for ExportQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportQuality::Light => "light",
            ExportQuality::Medium => "medium",
            ExportQuality::Strong => "strong",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ExportQuality::Light),
            "medium" => Ok(ExportQuality::Medium),
            "strong" => Ok(ExportQuality::Strong),
            other => Err(format!("unknown quality '{other}' (light, medium, strong)")),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp4" => Ok(ExportFormat::Mp4),
            "gif" => Ok(ExportFormat::Gif),
            other => Err(format!("unknown format '{other}' (mp4, gif)")),
        }
    }
}

/// Estimates the exported size in bytes.
///
/// The trimmed share of the source size is scaled by the quality and format
/// factors. Returns `None` when the source duration is not known yet, so the
/// caller can keep its previous estimate.
///
/// # Examples
///
/// ```
/// use clipcut::domain::{estimate_export_size, ExportFormat, ExportQuality};
///
/// // Half of a 1000 byte clip, medium mp4.
/// let size = estimate_export_size(1000, 10_000.0, 0.0, 5_000.0, ExportQuality::Medium, ExportFormat::Mp4);
/// assert_eq!(size, Some(250));
/// ```
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn estimate_export_size(
    source_size: u64,
    source_duration_ms: f64,
    trim_start_ms: f64,
    trim_end_ms: f64,
    quality: ExportQuality,
    format: ExportFormat,
) -> Option<u64> {
    if !(source_duration_ms.is_finite() && source_duration_ms > 0.0) {
        return None;
    }
    let duration_ratio = (trim_end_ms - trim_start_ms) / source_duration_ms;
    let base_size = source_size as f64 * duration_ratio;
    let estimate = (base_size * quality.size_factor() * format.size_factor()).round();
    Some(estimate.max(0.0) as u64)
}
