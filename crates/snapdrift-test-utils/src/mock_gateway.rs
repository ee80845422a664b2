// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock asset server for deterministic testing.
//!
//! `MockGateway` implements `RemoteAssetGateway` over an in-memory asset
//! table. Random sampling replays scripted batches in order, so tests decide
//! exactly which candidates the discovery engine sees.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use snapdrift_core::{
    AdapterType, AssetCandidate, AssetInfo, HealthStatus, MediaType, PluginAdapter,
    RemoteAssetGateway, ServerStats, SnapdriftError,
};

/// A mock asset server for testing.
///
/// - **assets**: metadata served by `get_asset_info()`; payloads are the id's bytes
/// - **batches**: scripted `get_random_assets()` results, replayed front to back;
///   once exhausted every call returns an empty batch
#[derive(Default)]
pub struct MockGateway {
    assets: Mutex<HashMap<String, AssetInfo>>,
    batches: Mutex<VecDeque<Vec<String>>>,
    favorites: Mutex<HashMap<String, bool>>,
    deleted: Mutex<HashSet<String>>,
    stats: Mutex<ServerStats>,
    random_calls: AtomicUsize,
    info_calls: AtomicUsize,
    data_calls: AtomicUsize,
    fail_random: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an asset with deterministic metadata.
    pub fn asset(id: &str, media_type: MediaType, byte_size: u64) -> AssetInfo {
        let (ext, content_type) = match media_type {
            MediaType::Image => ("jpg", "image/jpeg"),
            MediaType::Video => ("mp4", "video/mp4"),
        };
        AssetInfo {
            id: id.to_string(),
            original_file_name: format!("{id}.{ext}"),
            content_type: content_type.to_string(),
            media_type,
            byte_size,
            created_at: Utc
                .with_ymd_and_hms(2024, 3, 5, 14, 30, 0)
                .single()
                .unwrap_or_else(Utc::now),
            width: Some(4032),
            height: Some(3024),
        }
    }

    /// Add an asset to the table.
    pub fn add_asset(&self, info: AssetInfo) {
        self.lock(&self.assets).insert(info.id.clone(), info);
    }

    /// Queue one random-sampling result.
    ///
    /// Ids do not have to exist in the asset table; unknown ids answer
    /// `NotFound` on lookup.
    pub fn push_batch(&self, ids: &[&str]) {
        self.lock(&self.batches)
            .push_back(ids.iter().map(|s| s.to_string()).collect());
    }

    /// Make every random-sampling call fail with a transient error.
    pub fn fail_random(&self, fail: bool) {
        self.fail_random.store(fail, Ordering::SeqCst);
    }

    pub fn set_stats(&self, stats: ServerStats) {
        *self.lock(&self.stats) = stats;
    }

    /// Favorite flag last written for `id`, if any.
    pub fn favorite(&self, id: &str) -> Option<bool> {
        self.lock(&self.favorites).get(id).copied()
    }

    pub fn is_deleted(&self, id: &str) -> bool {
        self.lock(&self.deleted).contains(id)
    }

    pub fn random_calls(&self) -> usize {
        self.random_calls.load(Ordering::SeqCst)
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn data_calls(&self) -> usize {
        self.data_calls.load(Ordering::SeqCst)
    }

    fn lock<'a, T>(&self, m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
        m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lookup(&self, id: &str) -> Result<AssetInfo, SnapdriftError> {
        if self.is_deleted(id) {
            return Err(SnapdriftError::NotFound { id: id.to_string() });
        }
        self.lock(&self.assets)
            .get(id)
            .cloned()
            .ok_or_else(|| SnapdriftError::NotFound { id: id.to_string() })
    }
}

#[async_trait]
impl PluginAdapter for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AssetSource
    }

    async fn health_check(&self) -> Result<HealthStatus, SnapdriftError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SnapdriftError> {
        Ok(())
    }
}

#[async_trait]
impl RemoteAssetGateway for MockGateway {
    async fn get_asset_info(&self, id: &str) -> Result<AssetInfo, SnapdriftError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(id)
    }

    async fn get_asset_data(&self, id: &str) -> Result<Vec<u8>, SnapdriftError> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(id).map(|info| info.id.into_bytes())
    }

    async fn get_random_assets(&self, count: usize) -> Result<Vec<AssetCandidate>, SnapdriftError> {
        self.random_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_random.load(Ordering::SeqCst) {
            return Err(SnapdriftError::upstream("mock random sampling failure"));
        }

        let batch = self.lock(&self.batches).pop_front().unwrap_or_default();
        Ok(batch
            .into_iter()
            .take(count)
            .map(|id| AssetCandidate { id })
            .collect())
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), SnapdriftError> {
        self.lookup(id)?;
        self.lock(&self.favorites).insert(id.to_string(), favorite);
        Ok(())
    }

    async fn delete_asset(&self, id: &str) -> Result<(), SnapdriftError> {
        self.lookup(id)?;
        self.lock(&self.deleted).insert(id.to_string());
        Ok(())
    }

    async fn get_server_stats(&self) -> Result<ServerStats, SnapdriftError> {
        Ok(*self.lock(&self.stats))
    }
}
