// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the PreferenceStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use snapdrift_config::model::StorageConfig;
use snapdrift_core::{
    AdapterType, HealthStatus, PluginAdapter, PreferenceStore, SnapdriftError, UserId,
    UserPreferences,
};

use crate::database::{Database, map_tr_err};
use crate::queries::preferences;

/// SQLite-backed preference store.
///
/// The database is opened lazily by [`PreferenceStore::initialize`], or
/// eagerly with [`SqlitePreferenceStore::in_memory`].
pub struct SqlitePreferenceStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqlitePreferenceStore {
    /// Create a store for the configured path. Nothing is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// An initialized store backed by a private in-memory database.
    pub async fn in_memory() -> Result<Self, SnapdriftError> {
        let db = Database::open_in_memory().await?;
        Ok(Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
            },
            db: OnceCell::new_with(Some(db)),
        })
    }

    fn db(&self) -> Result<&Database, SnapdriftError> {
        self.db.get().ok_or_else(|| SnapdriftError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqlitePreferenceStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SnapdriftError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SnapdriftError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn initialize(&self) -> Result<(), SnapdriftError> {
        if self.db.initialized() {
            return Ok(());
        }
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| SnapdriftError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "preference storage initialized");
        Ok(())
    }

    async fn get(&self, user: &UserId) -> Result<UserPreferences, SnapdriftError> {
        Ok(preferences::get_preferences(self.db()?, user)
            .await?
            .unwrap_or_default())
    }

    async fn put(&self, user: &UserId, prefs: &UserPreferences) -> Result<(), SnapdriftError> {
        preferences::put_preferences(self.db()?, user, prefs).await
    }

    async fn reset(&self, user: &UserId) -> Result<(), SnapdriftError> {
        preferences::delete_preferences(self.db()?, user).await
    }
}
