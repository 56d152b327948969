// SPDX-License-Identifier: MPL-2.0
//! Loading and saving user preferences in a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[thumbnails]` - Canvas size, JPEG quality, batch size and time limit
//! - `[library]` - File extensions picked up by the directory scan
//! - `[export]` - Default export quality/format and progress pacing
//! - `[diagnostics]` - Size of the in-memory event buffer
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `CLIPCUT_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! Every field is optional; missing values fall back to [`defaults`].

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::domain::{BufferCapacity, ConcurrencyLimit, ExportFormat, ExportQuality, JpegQuality};
use crate::error::{Error, Result};
use crate::media::ThumbnailSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Thumbnail pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThumbnailsConfig {
    #[serde(default = "default_width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default = "default_height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// JPEG quality (1-100).
    #[serde(
        default = "default_jpeg_quality",
        skip_serializing_if = "Option::is_none"
    )]
    pub jpeg_quality: Option<u8>,

    /// Clips processed per batch.
    #[serde(
        default = "default_max_concurrent",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_concurrent: Option<usize>,

    /// Time limit per clip, probe included.
    #[serde(
        default = "default_timeout_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_secs: Option<u64>,

    /// Preferred capture position in seconds.
    #[serde(
        default = "default_capture_at_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub capture_at_secs: Option<f64>,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            jpeg_quality: default_jpeg_quality(),
            max_concurrent: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            capture_at_secs: default_capture_at_secs(),
        }
    }
}

/// Directory scan settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LibraryConfig {
    /// Extensions without the leading dot, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_quality: Option<ExportQuality>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<ExportFormat>,

    /// Delay between two progress steps in milliseconds.
    #[serde(
        default = "default_progress_step_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub progress_step_ms: Option<u64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_quality: None,
            default_format: None,
            progress_step_ms: default_progress_step_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DiagnosticsConfig {
    /// Events kept in memory before the oldest are dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_capacity: Option<usize>,
}

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub thumbnails: ThumbnailsConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// =============================================================================
// Default Value Functions (for serde)
// =============================================================================

fn default_width() -> Option<u32> {
    Some(DEFAULT_THUMBNAIL_WIDTH)
}

fn default_height() -> Option<u32> {
    Some(DEFAULT_THUMBNAIL_HEIGHT)
}

fn default_jpeg_quality() -> Option<u8> {
    Some(DEFAULT_JPEG_QUALITY)
}

fn default_max_concurrent() -> Option<usize> {
    Some(DEFAULT_MAX_CONCURRENT)
}

fn default_timeout_secs() -> Option<u64> {
    Some(DEFAULT_THUMBNAIL_TIMEOUT_SECS)
}

fn default_capture_at_secs() -> Option<f64> {
    Some(DEFAULT_CAPTURE_AT_SECS)
}

fn default_progress_step_ms() -> Option<u64> {
    Some(DEFAULT_PROGRESS_STEP_MS)
}

// =============================================================================
// Resolved Values
// =============================================================================

impl Config {
    /// Pipeline settings with every value brought into its valid range.
    #[must_use]
    pub fn thumbnail_settings(&self) -> ThumbnailSettings {
        let section = &self.thumbnails;
        let edge = |value: Option<u32>, default: u32| {
            value
                .unwrap_or(default)
                .clamp(MIN_THUMBNAIL_EDGE, MAX_THUMBNAIL_EDGE)
        };
        let capture_at_secs = section
            .capture_at_secs
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .unwrap_or(DEFAULT_CAPTURE_AT_SECS);

        ThumbnailSettings {
            width: edge(section.width, DEFAULT_THUMBNAIL_WIDTH),
            height: edge(section.height, DEFAULT_THUMBNAIL_HEIGHT),
            quality: JpegQuality::new(section.jpeg_quality.unwrap_or(DEFAULT_JPEG_QUALITY)),
            max_concurrent: ConcurrencyLimit::new(
                section.max_concurrent.unwrap_or(DEFAULT_MAX_CONCURRENT),
            ),
            timeout: Duration::from_secs(
                section
                    .timeout_secs
                    .unwrap_or(DEFAULT_THUMBNAIL_TIMEOUT_SECS)
                    .clamp(MIN_THUMBNAIL_TIMEOUT_SECS, MAX_THUMBNAIL_TIMEOUT_SECS),
            ),
            capture_at_secs,
        }
    }

    /// Extensions for the directory scan; an empty list means the defaults.
    #[must_use]
    pub fn library_extensions(&self) -> Vec<String> {
        match &self.library.extensions {
            Some(list) if !list.is_empty() => list
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            _ => DEFAULT_LIBRARY_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn progress_step_delay(&self) -> Duration {
        Duration::from_millis(
            self.export
                .progress_step_ms
                .unwrap_or(DEFAULT_PROGRESS_STEP_MS)
                .min(MAX_PROGRESS_STEP_MS),
        )
    }

    #[must_use]
    pub fn diagnostics_capacity(&self) -> BufferCapacity {
        BufferCapacity::new(
            self.diagnostics
                .buffer_capacity
                .unwrap_or(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
        )
    }
}

// =============================================================================
// Path Functions
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning message explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    return (
                        Config::default(),
                        Some(format!(
                            "Could not read {}, using defaults: {err}",
                            path.display()
                        )),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves configuration to a specific path, creating parent directories.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
