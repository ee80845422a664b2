// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Snapdrift bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use snapdrift_core::AccountTier;

/// Top-level Snapdrift configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SnapdriftConfig {
    /// Bot identity and chat behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Remote asset server settings.
    #[serde(default)]
    pub immich: ImmichConfig,

    /// Preference storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Per-tier upload ceilings.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Random discovery tuning.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Bot identity and chat behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prefix that marks a chat message as a command.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Seconds before error and acknowledgement replies are deleted.
    #[serde(default = "default_transient_message_secs")]
    pub transient_message_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            command_prefix: default_command_prefix(),
            transient_message_secs: default_transient_message_secs(),
        }
    }
}

fn default_bot_name() -> String {
    "snapdrift".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_command_prefix() -> String {
    "/".to_string()
}

fn default_transient_message_secs() -> u64 {
    10
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables Telegram integration.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// List of allowed Telegram user IDs or usernames.
    #[serde(default)]
    pub allowed_users: Vec<String>,
}

/// Immich server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImmichConfig {
    /// Base URL of the server, e.g. `https://photos.example.com`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key used for asset operations.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Admin API key used for server statistics. Falls back to `api_key`.
    #[serde(default)]
    pub admin_api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for idempotent requests that hit a transient error.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ImmichConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            admin_api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    1
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file holding user preferences.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("snapdrift").join("snapdrift.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("snapdrift.db"))
        .to_string_lossy()
        .into_owned()
}

/// Upload ceilings per account tier, in bytes (decimal megabytes).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    #[serde(default = "default_free_bytes")]
    pub free_bytes: u64,

    #[serde(default = "default_basic_bytes")]
    pub basic_bytes: u64,

    #[serde(default = "default_premium_bytes")]
    pub premium_bytes: u64,

    /// Tier applied to users who have not chosen one.
    #[serde(default = "default_tier")]
    pub default_tier: AccountTier,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_bytes: default_free_bytes(),
            basic_bytes: default_basic_bytes(),
            premium_bytes: default_premium_bytes(),
            default_tier: default_tier(),
        }
    }
}

fn default_free_bytes() -> u64 {
    25_000_000
}

fn default_basic_bytes() -> u64 {
    50_000_000
}

fn default_premium_bytes() -> u64 {
    500_000_000
}

fn default_tier() -> AccountTier {
    AccountTier::Free
}

/// Random discovery tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Upper bound on candidates requested per random-sampling call.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

fn default_batch_size() -> usize {
    5
}
