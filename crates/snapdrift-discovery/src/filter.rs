// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Candidate filtering for random discovery.

use snapdrift_core::MediaType;

/// Largest number of assets one discovery request may ask for.
pub const MAX_TARGET_COUNT: u32 = 10;

/// Constraints a discovered asset must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub media_type: Option<MediaType>,
    pub min_bytes: Option<u64>,
    pub max_bytes: Option<u64>,
    /// Always within `1..=MAX_TARGET_COUNT`.
    pub target_count: u32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            media_type: None,
            min_bytes: None,
            max_bytes: None,
            target_count: 1,
        }
    }
}

impl FilterSpec {
    /// Build a filter, resetting an out-of-range count to 1.
    ///
    /// A zero size bound is treated as "no bound".
    pub fn new(
        media_type: Option<MediaType>,
        min_bytes: Option<u64>,
        max_bytes: Option<u64>,
        requested_count: i64,
    ) -> Self {
        Self {
            media_type,
            min_bytes: min_bytes.filter(|&b| b > 0),
            max_bytes: max_bytes.filter(|&b| b > 0),
            target_count: normalize_count(requested_count),
        }
    }
}

/// Counts outside `1..=MAX_TARGET_COUNT` become 1, they are not clamped.
pub fn normalize_count(requested: i64) -> u32 {
    if (1..=i64::from(MAX_TARGET_COUNT)).contains(&requested) {
        requested as u32
    } else {
        1
    }
}

/// Whether a candidate of `candidate_type` and `candidate_bytes` passes `spec`.
///
/// The type comparison ignores ASCII case, so `"IMAGE"` matches
/// [`MediaType::Image`].
pub fn matches(candidate_type: &str, candidate_bytes: u64, spec: &FilterSpec) -> bool {
    if let Some(wanted) = spec.media_type {
        if !candidate_type.eq_ignore_ascii_case(wanted.as_str()) {
            return false;
        }
    }
    if let Some(min) = spec.min_bytes {
        if candidate_bytes < min {
            return false;
        }
    }
    if let Some(max) = spec.max_bytes {
        if candidate_bytes > max {
            return false;
        }
    }
    true
}
