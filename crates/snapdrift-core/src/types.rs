// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Snapdrift bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Chat-platform identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Chat-platform identifier of a conversation (DM or group).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub String);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a message previously sent through a [`NotificationSink`].
///
/// [`NotificationSink`]: crate::traits::NotificationSink
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub chat_id: ChatId,
    pub message_id: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role of an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    AssetSource,
    Storage,
}

/// Kind of media held by the asset server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

/// Account classification that determines the largest payload the chat
/// transport will accept from this user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Basic,
    Premium,
}

/// A bare asset reference returned by a random-sampling query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCandidate {
    pub id: String,
}

/// Full metadata snapshot for a single asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetInfo {
    pub id: String,
    pub original_file_name: String,
    pub content_type: String,
    pub media_type: MediaType,
    pub byte_size: u64,
    pub created_at: DateTime<Utc>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Aggregate counts reported by the asset server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerStats {
    pub photo_count: u64,
    pub video_count: u64,
}

impl ServerStats {
    pub fn total(&self) -> u64 {
        self.photo_count + self.video_count
    }
}

/// A file attachment to be delivered through a notification sink.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub data: Vec<u8>,
    pub filename: String,
    pub caption: String,
}

/// A chat message addressed to the bot.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    /// Platform message id of the command itself.
    pub id: String,
    pub chat_id: ChatId,
    pub sender_id: UserId,
    pub text: String,
    /// ISO 8601 receive timestamp.
    pub timestamp: String,
}

/// Default cap on candidates considered per discovery job.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;

/// Default progress report interval, in seconds.
pub const DEFAULT_PROGRESS_INTERVAL_SECS: u64 = 5;

/// Default auto-delete delay for transient replies, in seconds.
pub const DEFAULT_MESSAGE_DELETE_DELAY_SECS: u64 = 10;

/// Persisted per-user settings.
///
/// Every field carries a serde default so a record written by an older
/// version (or edited by hand) loads with missing fields backfilled and
/// present fields kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub max_attempts: u32,
    pub default_media_type: Option<MediaType>,
    pub min_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
    #[serde(alias = "progress_update_interval")]
    pub progress_update_interval_secs: u64,
    #[serde(alias = "message_delete_delay")]
    pub message_delete_delay_secs: u64,
    /// `None` means the deployment's configured default tier.
    pub account_tier: Option<AccountTier>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_media_type: None,
            min_size_bytes: None,
            max_size_bytes: None,
            progress_update_interval_secs: DEFAULT_PROGRESS_INTERVAL_SECS,
            message_delete_delay_secs: DEFAULT_MESSAGE_DELETE_DELAY_SECS,
            account_tier: None,
        }
    }
}

impl UserPreferences {
    /// The tier to apply, falling back to the deployment default.
    pub fn tier_or(&self, default: AccountTier) -> AccountTier {
        self.account_tier.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn media_type_parses_case_insensitively() {
        assert_eq!(MediaType::from_str("IMAGE").unwrap(), MediaType::Image);
        assert_eq!(MediaType::from_str("Video").unwrap(), MediaType::Video);
        assert!(MediaType::from_str("audio").is_err());
        assert_eq!(MediaType::Image.to_string(), "image");
    }

    #[test]
    fn account_tier_round_trips_through_strings() {
        for tier in [AccountTier::Free, AccountTier::Basic, AccountTier::Premium] {
            let s = tier.to_string();
            assert_eq!(AccountTier::from_str(&s).unwrap(), tier);
        }
        assert!(AccountTier::from_str("platinum").is_err());
    }

    #[test]
    fn preferences_backfill_missing_fields() {
        let json = r#"{"max_attempts": 12, "default_media_type": "video"}"#;
        let prefs: UserPreferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.max_attempts, 12);
        assert_eq!(prefs.default_media_type, Some(MediaType::Video));
        assert_eq!(prefs.progress_update_interval_secs, DEFAULT_PROGRESS_INTERVAL_SECS);
        assert_eq!(prefs.message_delete_delay_secs, DEFAULT_MESSAGE_DELETE_DELAY_SECS);
        assert!(prefs.min_size_bytes.is_none());
        assert!(prefs.account_tier.is_none());
    }

    #[test]
    fn preferences_accept_legacy_interval_key() {
        let json = r#"{"progress_update_interval": 9, "min_size_bytes": 2000000}"#;
        let prefs: UserPreferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.progress_update_interval_secs, 9);
        assert_eq!(prefs.min_size_bytes, Some(2_000_000));
        assert_eq!(prefs.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn tier_falls_back_to_default() {
        let mut prefs = UserPreferences::default();
        assert_eq!(prefs.tier_or(AccountTier::Basic), AccountTier::Basic);
        prefs.account_tier = Some(AccountTier::Premium);
        assert_eq!(prefs.tier_or(AccountTier::Basic), AccountTier::Premium);
    }

    #[test]
    fn server_stats_total() {
        let stats = ServerStats {
            photo_count: 1200,
            video_count: 34,
        };
        assert_eq!(stats.total(), 1234);
    }
}
