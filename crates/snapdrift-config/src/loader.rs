// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./snapdrift.toml` > `~/.config/snapdrift/snapdrift.toml`
//! > `/etc/snapdrift/snapdrift.toml` with environment variable overrides via the
//! `SNAPDRIFT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SnapdriftConfig;

/// Top-level sections, used to map `SNAPDRIFT_<SECTION>_<KEY>` env vars.
pub(crate) const SECTIONS: &[&str] = &["bot", "telegram", "immich", "storage", "limits", "discovery"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/snapdrift/snapdrift.toml` (system-wide)
/// 3. `~/.config/snapdrift/snapdrift.toml` (user XDG config)
/// 4. `./snapdrift.toml` (local directory)
/// 5. `SNAPDRIFT_*` environment variables
pub fn load_config() -> Result<SnapdriftConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SnapdriftConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SnapdriftConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SnapdriftConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SnapdriftConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SnapdriftConfig::default()))
        .merge(Toml::file("/etc/snapdrift/snapdrift.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("snapdrift/snapdrift.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("snapdrift.toml"))
        .merge(env_provider())
}

/// Environment provider that maps only the section separator to a dot.
///
/// `SNAPDRIFT_TELEGRAM_BOT_TOKEN` must become `telegram.bot_token`, not
/// `telegram.bot.token`, so `Env::split("_")` cannot be used.
fn env_provider() -> Env {
    Env::prefixed("SNAPDRIFT_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config path.
pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_only_at_section() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("immich_api_key"), "immich.api_key");
        assert_eq!(map_env_key("bot_log_level"), "bot.log_level");
        assert_eq!(map_env_key("limits_default_tier"), "limits.default_tier");
        assert_eq!(map_env_key("discovery_batch_size"), "discovery.batch_size");
    }

    #[test]
    fn unknown_env_section_is_left_alone() {
        assert_eq!(map_env_key("something_else"), "something_else");
        assert_eq!(map_env_key("botany"), "botany");
    }
}
