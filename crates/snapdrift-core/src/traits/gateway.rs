// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote asset server abstraction (Immich and compatible APIs).

use async_trait::async_trait;

use crate::error::SnapdriftError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AssetCandidate, AssetInfo, ServerStats};

/// Client for the remote photo/video server.
///
/// Implementations return [`SnapdriftError::NotFound`] when an asset id no
/// longer exists and [`SnapdriftError::Upstream`] for network or server
/// failures. Metadata that cannot be interpreted (for example an asset type
/// other than image or video) is reported as `Upstream` so callers skip it.
#[async_trait]
pub trait RemoteAssetGateway: PluginAdapter {
    /// Fetches the full metadata for one asset.
    async fn get_asset_info(&self, id: &str) -> Result<AssetInfo, SnapdriftError>;

    /// Downloads the original bytes of one asset.
    async fn get_asset_data(&self, id: &str) -> Result<Vec<u8>, SnapdriftError>;

    /// Samples up to `count` random assets.
    async fn get_random_assets(&self, count: usize) -> Result<Vec<AssetCandidate>, SnapdriftError>;

    /// Marks or unmarks an asset as favorite.
    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), SnapdriftError>;

    /// Permanently deletes an asset.
    async fn delete_asset(&self, id: &str) -> Result<(), SnapdriftError>;

    /// Fetches aggregate photo and video counts.
    async fn get_server_stats(&self) -> Result<ServerStats, SnapdriftError>;
}
