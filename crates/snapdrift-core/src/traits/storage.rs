// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for per-user preference persistence.

use async_trait::async_trait;

use crate::error::SnapdriftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{UserId, UserPreferences};

/// Durable key/value store of [`UserPreferences`], one record per user.
///
/// Records must survive a process restart.
#[async_trait]
pub trait PreferenceStore: PluginAdapter {
    /// Initializes the backend (schema creation, connection setup).
    async fn initialize(&self) -> Result<(), SnapdriftError>;

    /// Loads a user's preferences, returning defaults when none are stored.
    async fn get(&self, user: &UserId) -> Result<UserPreferences, SnapdriftError>;

    /// Stores a user's preferences, replacing any previous record.
    async fn put(&self, user: &UserId, prefs: &UserPreferences) -> Result<(), SnapdriftError>;

    /// Resets a user's preferences to defaults.
    async fn reset(&self, user: &UserId) -> Result<(), SnapdriftError> {
        self.put(user, &UserPreferences::default()).await
    }
}
