// SPDX-License-Identifier: MPL-2.0
//! File-size tiering policy.
//!
//! Large recordings are expensive to decode on the headset, so every file
//! is placed in a tier once at scan time. BLOCKED files can never be opened.

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Files at or above this size show a warning before opening (200 MB).
pub const WARNING_THRESHOLD_BYTES: u64 = 200 * MIB;

/// Files at or above this size cannot be opened (500 MB).
pub const BLOCKED_THRESHOLD_BYTES: u64 = 500 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeTier {
    Safe,
    Warning,
    Blocked,
}

impl SizeTier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Safe => "SAFE",
            SizeTier::Warning => "WARNING",
            SizeTier::Blocked => "BLOCKED",
        }
    }
}

/// Result of classifying one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeClass {
    pub tier: SizeTier,
    pub can_load: bool,
}

/// Classifies a file size into its tier.
///
/// # Examples
///
/// ```
/// use clipcut::domain::{classify, SizeTier};
///
/// let class = classify(250 * 1024 * 1024);
/// assert_eq!(class.tier, SizeTier::Warning);
/// assert!(class.can_load);
/// ```
#[must_use]
pub fn classify(size_bytes: u64) -> SizeClass {
    if size_bytes >= BLOCKED_THRESHOLD_BYTES {
        SizeClass {
            tier: SizeTier::Blocked,
            can_load: false,
        }
    } else if size_bytes >= WARNING_THRESHOLD_BYTES {
        SizeClass {
            tier: SizeTier::Warning,
            can_load: true,
        }
    } else {
        SizeClass {
            tier: SizeTier::Safe,
            can_load: true,
        }
    }
}
