// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `snapdrift doctor` command implementation.
//!
//! Runs diagnostic checks against the configured environment to find
//! configuration mistakes, storage problems, and unreachable services before
//! `serve` is started.

use std::time::{Duration, Instant};

use snapdrift_config::SnapdriftConfig;
use snapdrift_config::model::{ImmichConfig, LimitsConfig, StorageConfig, TelegramConfig};
use snapdrift_core::{HealthStatus, PluginAdapter, PreferenceStore, SnapdriftError};
use snapdrift_discovery::{SizeLimitPolicy, format_size};
use snapdrift_immich::ImmichGateway;
use snapdrift_storage::SqlitePreferenceStore;
use snapdrift_telegram::TelegramChannel;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }

    fn from_health(name: &str, health: Result<HealthStatus, SnapdriftError>, start: Instant) -> Self {
        match health {
            Ok(HealthStatus::Healthy) => Self::new(name, CheckStatus::Pass, "reachable", start),
            Ok(HealthStatus::Degraded(reason)) => Self::new(name, CheckStatus::Warn, reason, start),
            Ok(HealthStatus::Unhealthy(reason)) => Self::new(name, CheckStatus::Fail, reason, start),
            Err(e) => Self::new(name, CheckStatus::Fail, e.to_string(), start),
        }
    }
}

/// Run the `snapdrift doctor` command.
///
/// Fails when at least one check failed; warnings are reported only.
pub async fn run_doctor(config: &SnapdriftConfig) -> Result<(), SnapdriftError> {
    let results = vec![
        check_limits(&config.limits),
        check_database(&config.storage).await,
        check_immich(&config.immich).await,
        check_telegram(&config.telegram).await,
        check_authorization(&config.telegram),
    ];

    println!();
    println!("  snapdrift doctor");
    println!("  {}", "-".repeat(50));

    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        println!(
            "    {tag} {:<16} {} ({}ms)",
            result.name,
            result.message,
            result.duration.as_millis()
        );
    }
    println!();

    let failed = count(&results, CheckStatus::Fail);
    let warned = count(&results, CheckStatus::Warn);
    if failed + warned == 0 {
        println!("  All checks passed.");
    } else {
        let issues = failed + warned;
        let word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {word} found.");
    }
    println!();

    if failed > 0 {
        return Err(SnapdriftError::Config(format!("{failed} doctor check(s) failed")));
    }
    Ok(())
}

fn count(results: &[CheckResult], status: CheckStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}

/// Resolve the per-tier size policy.
fn check_limits(limits: &LimitsConfig) -> CheckResult {
    let start = Instant::now();
    match SizeLimitPolicy::from_config(limits) {
        Ok(policy) => CheckResult::new(
            "Size limits",
            CheckStatus::Pass,
            format!(
                "free {}, basic {}, premium {} (default {})",
                format_size(limits.free_bytes),
                format_size(limits.basic_bytes),
                format_size(limits.premium_bytes),
                policy.default_tier()
            ),
            start,
        ),
        Err(e) => CheckResult::new("Size limits", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Open the preference database and run a trivial query.
async fn check_database(storage: &StorageConfig) -> CheckResult {
    let start = Instant::now();
    let path = std::path::Path::new(&storage.database_path);

    if !path.exists() {
        return CheckResult::new(
            "Database",
            CheckStatus::Warn,
            format!(
                "not found: {} (will be created on first run)",
                storage.database_path
            ),
            start,
        );
    }

    let store = SqlitePreferenceStore::new(storage.clone());
    if let Err(e) = store.initialize().await {
        return CheckResult::new("Database", CheckStatus::Fail, format!("open failed: {e}"), start);
    }
    let result = CheckResult::from_health("Database", store.health_check().await, start);
    // Best effort; the check result is already known.
    let _ = store.shutdown().await;
    result
}

async fn check_immich(immich: &ImmichConfig) -> CheckResult {
    let start = Instant::now();
    match ImmichGateway::new(immich) {
        Ok(gateway) => CheckResult::from_health("Immich", gateway.health_check().await, start),
        Err(e) => CheckResult::new("Immich", CheckStatus::Fail, e.to_string(), start),
    }
}

async fn check_telegram(telegram: &TelegramConfig) -> CheckResult {
    let start = Instant::now();
    match TelegramChannel::new(telegram.clone()) {
        Ok(channel) => CheckResult::from_health("Telegram", channel.health_check().await, start),
        Err(e) => CheckResult::new("Telegram", CheckStatus::Fail, e.to_string(), start),
    }
}

/// An empty allow-list is valid but makes the bot ignore everyone.
fn check_authorization(telegram: &TelegramConfig) -> CheckResult {
    let start = Instant::now();
    if telegram.allowed_users.is_empty() {
        CheckResult::new(
            "Allowed users",
            CheckStatus::Warn,
            "none configured; every message will be ignored",
            start,
        )
    } else {
        CheckResult::new(
            "Allowed users",
            CheckStatus::Pass,
            format!("{} configured", telegram.allowed_users.len()),
            start,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_at(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn default_limits_pass() {
        let result = check_limits(&LimitsConfig::default());
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.message.contains("free 25.00 MB"));
        assert!(result.message.contains("(default free)"));
    }

    #[test]
    fn zero_tier_limit_fails() {
        let limits = LimitsConfig {
            basic_bytes: 0,
            ..LimitsConfig::default()
        };
        assert_eq!(check_limits(&limits).status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn missing_database_warns() {
        let dir = tempfile::tempdir().unwrap();
        let result = check_database(&storage_at(&dir.path().join("absent.db"))).await;
        assert_eq!(result.status, CheckStatus::Warn);
        assert!(result.message.contains("not found"));
    }

    #[tokio::test]
    async fn existing_database_passes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_at(&dir.path().join("prefs.db"));
        let store = SqlitePreferenceStore::new(storage.clone());
        store.initialize().await.unwrap();
        store.shutdown().await.unwrap();

        let result = check_database(&storage).await;
        assert_eq!(result.status, CheckStatus::Pass, "{}", result.message);
    }

    #[tokio::test]
    async fn unconfigured_immich_fails() {
        let result = check_immich(&ImmichConfig::default()).await;
        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("base_url"));
    }

    #[tokio::test]
    async fn missing_bot_token_fails() {
        let result = check_telegram(&TelegramConfig::default()).await;
        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn empty_allow_list_warns() {
        let mut telegram = TelegramConfig::default();
        assert_eq!(check_authorization(&telegram).status, CheckStatus::Warn);
        telegram.allowed_users.push("12345".into());
        assert_eq!(check_authorization(&telegram).status, CheckStatus::Pass);
    }

    #[test]
    fn health_maps_to_status() {
        let start = Instant::now();
        let cases = [
            (Ok(HealthStatus::Healthy), CheckStatus::Pass),
            (Ok(HealthStatus::Degraded("slow".into())), CheckStatus::Warn),
            (Ok(HealthStatus::Unhealthy("down".into())), CheckStatus::Fail),
            (Err(SnapdriftError::Internal("boom".into())), CheckStatus::Fail),
        ];
        for (health, expected) in cases {
            assert_eq!(CheckResult::from_health("x", health, start).status, expected);
        }
    }
}
