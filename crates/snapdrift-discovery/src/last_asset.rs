// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user pointer to the most recently delivered asset.

use dashmap::DashMap;
use snapdrift_core::{MessageHandle, UserId};

/// The asset a user last received and the notification that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAssetRecord {
    pub asset_id: String,
    pub handle: MessageHandle,
}

#[derive(Debug, Default)]
pub struct LastAssetRegistry {
    records: DashMap<UserId, LastAssetRecord>,
}

impl LastAssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the user's record.
    pub fn record(&self, user_id: &UserId, asset_id: &str, handle: MessageHandle) {
        self.records.insert(
            user_id.clone(),
            LastAssetRecord {
                asset_id: asset_id.to_string(),
                handle,
            },
        );
    }

    pub fn get(&self, user_id: &UserId) -> Option<LastAssetRecord> {
        self.records.get(user_id).map(|r| r.clone())
    }

    /// Remove the user's record. Idempotent.
    pub fn clear(&self, user_id: &UserId) {
        self.records.remove(user_id);
    }

    /// Remove the record only if it still points at `asset_id`.
    ///
    /// The check and the removal happen under the same shard lock, so a
    /// newer record written concurrently is never removed.
    pub fn clear_if(&self, user_id: &UserId, asset_id: &str) -> bool {
        self.records
            .remove_if(user_id, |_, record| record.asset_id == asset_id)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapdrift_core::ChatId;

    fn handle(id: &str) -> MessageHandle {
        MessageHandle {
            chat_id: ChatId("chat".into()),
            message_id: id.into(),
        }
    }

    #[test]
    fn record_overwrites() {
        let registry = LastAssetRegistry::new();
        let u = UserId("u".into());
        registry.record(&u, "a1", handle("m1"));
        registry.record(&u, "a2", handle("m2"));
        let last = registry.get(&u).unwrap();
        assert_eq!(last.asset_id, "a2");
        assert_eq!(last.handle, handle("m2"));
    }

    #[test]
    fn clear_if_ignores_newer_record() {
        let registry = LastAssetRegistry::new();
        let u = UserId("u".into());
        registry.record(&u, "new", handle("m2"));
        assert!(!registry.clear_if(&u, "old"));
        assert_eq!(registry.get(&u).unwrap().asset_id, "new");
        assert!(registry.clear_if(&u, "new"));
        assert!(registry.get(&u).is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let registry = LastAssetRegistry::new();
        let u = UserId("u".into());
        registry.clear(&u);
        registry.record(&u, "a", handle("m"));
        registry.clear(&u);
        registry.clear(&u);
        assert!(registry.get(&u).is_none());
    }
}
