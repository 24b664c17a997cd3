//! Shared types used across idsweep.
//!
//! This module defines the ID range a sweep covers and the record kept for
//! every confirmed match.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Format used when a match timestamp is written to the results file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Closed interval of numeric IDs to probe.
///
/// Both bounds are inclusive. A range whose `start` is greater than its `end`
/// is empty: a sweep over it issues no requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanRange {
    /// First ID to probe
    pub start: u64,
    /// Last ID to probe (inclusive)
    pub end: u64,
}

impl ScanRange {
    /// Create a new range covering `start..=end`.
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Whether the range contains no IDs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of IDs in the range.
    #[must_use]
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).saturating_add(1)
        }
    }

    /// Lazy, non-restartable sequence of every ID in the range, in order.
    #[must_use]
    pub fn ids(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// A confirmed match.
///
/// Created once per matching probe and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// ID that matched
    pub id: u64,
    /// Public URL of the matched resource
    pub url: String,
    /// Title extracted from the response body (or the placeholder)
    pub title: String,
    /// Local wall-clock time the match was confirmed
    pub discovered_at: DateTime<Local>,
}

impl MatchRecord {
    /// Create a record stamped with the current local time.
    #[must_use]
    pub fn new(id: u64, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            title: title.into(),
            discovered_at: Local::now(),
        }
    }

    /// Discovery timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn discovered_at_display(&self) -> String {
        self.discovered_at.format(TIMESTAMP_FORMAT).to_string()
    }
}
