// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express, such as
//! non-zero tier ceilings, URL schemes, and bounded batch sizes.

use crate::diagnostic::ConfigError;
use crate::model::SnapdriftConfig;

/// Largest accepted random-sampling batch.
pub const MAX_BATCH_SIZE: usize = 50;

/// Longest accepted transient reply lifetime, in seconds.
pub const MAX_TRANSIENT_MESSAGE_SECS: u64 = 3600;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first one.
pub fn validate_config(config: &SnapdriftConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.bot.command_prefix.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "bot.command_prefix must not be empty".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.bot.log_level.to_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` must be one of: {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.bot.transient_message_secs > MAX_TRANSIENT_MESSAGE_SECS {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.transient_message_secs must be at most {MAX_TRANSIENT_MESSAGE_SECS}, got {}",
                config.bot.transient_message_secs
            ),
        });
    }

    for (key, bytes) in [
        ("limits.free_bytes", config.limits.free_bytes),
        ("limits.basic_bytes", config.limits.basic_bytes),
        ("limits.premium_bytes", config.limits.premium_bytes),
    ] {
        if bytes == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    if let Some(url) = &config.immich.base_url {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!("immich.base_url `{url}` must start with http:// or https://"),
            });
        }
    }

    if config.immich.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "immich.timeout_secs must be greater than zero".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let batch = config.discovery.batch_size;
    if batch == 0 || batch > MAX_BATCH_SIZE {
        errors.push(ConfigError::Validation {
            message: format!(
                "discovery.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {batch}"
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SnapdriftConfig::default()).is_ok());
    }

    #[test]
    fn zero_tier_ceiling_fails_validation() {
        let mut config = SnapdriftConfig::default();
        config.limits.basic_bytes = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("limits.basic_bytes"));
    }

    #[test]
    fn base_url_requires_http_scheme() {
        let mut config = SnapdriftConfig::default();
        config.immich.base_url = Some("photos.local:2283".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("immich.base_url"));

        config.immich.base_url = Some("https://photos.local".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn batch_size_is_bounded() {
        let mut config = SnapdriftConfig::default();
        config.discovery.batch_size = 0;
        assert!(validate_config(&config).is_err());
        config.discovery.batch_size = 51;
        assert!(validate_config(&config).is_err());
        config.discovery.batch_size = 50;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = SnapdriftConfig::default();
        config.storage.database_path = "  ".into();
        config.bot.log_level = "loud".into();
        config.bot.transient_message_secs = 86_400;
        config.immich.timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn empty_prefix_fails_validation() {
        let mut config = SnapdriftConfig::default();
        config.bot.command_prefix = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("command_prefix"));
    }
}
