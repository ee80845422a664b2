// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reads and writes of the `user_preferences` table.

use chrono::Utc;
use rusqlite::OptionalExtension;
use snapdrift_core::{SnapdriftError, UserId, UserPreferences};
use tracing::warn;

use crate::database::{Database, map_tr_err};

/// Load a user's preferences. `None` when no row exists.
///
/// A row that no longer decodes is logged and treated as absent.
pub async fn get_preferences(
    db: &Database,
    user: &UserId,
) -> Result<Option<UserPreferences>, SnapdriftError> {
    let user_id = user.0.clone();
    let raw: Option<String> = db
        .connection()
        .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
            conn.query_row(
                "SELECT prefs_json FROM user_preferences WHERE user_id = ?1",
                rusqlite::params![user_id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(raw.and_then(|json| match serde_json::from_str(&json) {
        Ok(prefs) => Some(prefs),
        Err(e) => {
            warn!(user_id = %user, error = %e, "discarding unreadable preferences");
            None
        }
    }))
}

/// Insert or replace a user's preferences.
pub async fn put_preferences(
    db: &Database,
    user: &UserId,
    prefs: &UserPreferences,
) -> Result<(), SnapdriftError> {
    let json = serde_json::to_string(prefs).map_err(|e| SnapdriftError::Storage {
        source: Box::new(e),
    })?;
    let user_id = user.0.clone();
    let now = Utc::now().to_rfc3339();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO user_preferences (user_id, prefs_json, updated_at) \
                 VALUES (?1, ?2, ?3) \
                 ON CONFLICT(user_id) DO UPDATE SET \
                 prefs_json = excluded.prefs_json, updated_at = excluded.updated_at",
                rusqlite::params![user_id, json, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Remove a user's row. Idempotent.
pub async fn delete_preferences(db: &Database, user: &UserId) -> Result<(), SnapdriftError> {
    let user_id = user.0.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "DELETE FROM user_preferences WHERE user_id = ?1",
                rusqlite::params![user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Store raw JSON for a user, bypassing serialization.
#[cfg(test)]
pub(crate) async fn put_raw(db: &Database, user: &str, json: &str) -> Result<(), SnapdriftError> {
    let user_id = user.to_string();
    let json = json.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR REPLACE INTO user_preferences (user_id, prefs_json, updated_at) \
                 VALUES (?1, ?2, '2024-01-01T00:00:00Z')",
                rusqlite::params![user_id, json],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}
