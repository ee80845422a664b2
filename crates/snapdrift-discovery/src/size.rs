// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tier-based transport ceilings and human-readable size strings.
//!
//! All multiples are decimal: `1mb` is 1,000,000 bytes and `1kb` is 1,000.

use snapdrift_config::model::LimitsConfig;
use snapdrift_core::{AccountTier, SnapdriftError};

pub const BYTES_PER_MB: u64 = 1_000_000;
pub const BYTES_PER_KB: u64 = 1_000;

/// Maps an account tier to the largest payload the chat transport accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimitPolicy {
    free: u64,
    basic: u64,
    premium: u64,
    default_tier: AccountTier,
}

impl SizeLimitPolicy {
    /// Build a policy from explicit ceilings. Every ceiling must be non-zero.
    pub fn new(
        free: u64,
        basic: u64,
        premium: u64,
        default_tier: AccountTier,
    ) -> Result<Self, SnapdriftError> {
        for (tier, bytes) in [
            (AccountTier::Free, free),
            (AccountTier::Basic, basic),
            (AccountTier::Premium, premium),
        ] {
            if bytes == 0 {
                return Err(SnapdriftError::Config(format!(
                    "size limit for tier `{tier}` must be greater than zero"
                )));
            }
        }
        Ok(Self {
            free,
            basic,
            premium,
            default_tier,
        })
    }

    pub fn from_config(limits: &LimitsConfig) -> Result<Self, SnapdriftError> {
        Self::new(
            limits.free_bytes,
            limits.basic_bytes,
            limits.premium_bytes,
            limits.default_tier,
        )
    }

    /// Ceiling in bytes for `tier`.
    pub fn resolve_limit(&self, tier: AccountTier) -> u64 {
        match tier {
            AccountTier::Free => self.free,
            AccountTier::Basic => self.basic,
            AccountTier::Premium => self.premium,
        }
    }

    /// Tier applied to users who never picked one.
    pub fn default_tier(&self) -> AccountTier {
        self.default_tier
    }
}

impl Default for SizeLimitPolicy {
    fn default() -> Self {
        Self {
            free: 25 * BYTES_PER_MB,
            basic: 50 * BYTES_PER_MB,
            premium: 500 * BYTES_PER_MB,
            default_tier: AccountTier::Free,
        }
    }
}

/// Parse `"2mb"`, `"500KB"`, `"1.5mb"` into a byte count.
///
/// The unit must end the string. Fractional byte counts are truncated.
/// Returns `None` for empty input, a missing or unknown unit, or a magnitude
/// that is not a finite non-negative number.
pub fn parse_size(text: &str) -> Option<u64> {
    let lower = text.to_ascii_lowercase();
    let (number, multiplier) = if let Some(n) = lower.strip_suffix("mb") {
        (n, BYTES_PER_MB)
    } else if let Some(n) = lower.strip_suffix("kb") {
        (n, BYTES_PER_KB)
    } else {
        return None;
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * multiplier as f64) as u64)
}

/// Render bytes as `"X.XX MB"` (at least 1,000,000 bytes) or `"X.XX KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes >= BYTES_PER_MB {
        format!("{:.2} MB", bytes as f64 / BYTES_PER_MB as f64)
    } else {
        format!("{:.2} KB", bytes as f64 / BYTES_PER_KB as f64)
    }
}
