// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Immich asset server adapter for Snapdrift.
//!
//! This crate implements [`RemoteAssetGateway`] over the Immich REST API:
//! asset metadata and originals, random sampling, favorites, deletion, and
//! server statistics.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use snapdrift_config::model::ImmichConfig;
use snapdrift_core::error::SnapdriftError;
use snapdrift_core::traits::{PluginAdapter, RemoteAssetGateway};
use snapdrift_core::types::{AdapterType, AssetCandidate, AssetInfo, HealthStatus, ServerStats};
use tracing::{debug, info};

use crate::client::ImmichClient;
use crate::types::{
    AssetResponse, DeleteAssetsRequest, PingResponse, RandomAsset, ServerStatisticsResponse,
    UpdateAssetRequest,
};

/// Immich gateway implementing [`RemoteAssetGateway`].
pub struct ImmichGateway {
    client: ImmichClient,
}

impl ImmichGateway {
    /// Creates a gateway from the `[immich]` config section.
    ///
    /// `base_url` and `api_key` are required.
    pub fn new(config: &ImmichConfig) -> Result<Self, SnapdriftError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| SnapdriftError::Config("immich.base_url is not set".into()))?;
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| SnapdriftError::Config("immich.api_key is not set".into()))?;

        let client = ImmichClient::new(
            base_url,
            api_key,
            config.admin_api_key.as_deref(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_max_retries(config.max_retries);

        info!(base_url = client.base_url(), "Immich gateway initialized");
        Ok(Self { client })
    }

    /// Creates a gateway with an existing client.
    pub fn with_client(client: ImmichClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for ImmichGateway {
    fn name(&self) -> &str {
        "immich"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::AssetSource
    }

    async fn health_check(&self) -> Result<HealthStatus, SnapdriftError> {
        match self
            .client
            .get_json::<PingResponse>("/api/server/ping", None, false)
            .await
        {
            Ok(ping) if ping.res == "pong" => Ok(HealthStatus::Healthy),
            Ok(ping) => Ok(HealthStatus::Degraded(format!(
                "unexpected ping reply `{}`",
                ping.res
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), SnapdriftError> {
        Ok(())
    }
}

#[async_trait]
impl RemoteAssetGateway for ImmichGateway {
    async fn get_asset_info(&self, id: &str) -> Result<AssetInfo, SnapdriftError> {
        let response: AssetResponse = self
            .client
            .get_json(&format!("/api/assets/{id}"), Some(id), false)
            .await?;
        AssetInfo::try_from(response)
    }

    async fn get_asset_data(&self, id: &str) -> Result<Vec<u8>, SnapdriftError> {
        let data = self
            .client
            .get_bytes(&format!("/api/assets/{id}/original"), Some(id))
            .await?;
        debug!(asset_id = id, bytes = data.len(), "asset downloaded");
        Ok(data)
    }

    async fn get_random_assets(&self, count: usize) -> Result<Vec<AssetCandidate>, SnapdriftError> {
        let assets: Vec<RandomAsset> = self
            .client
            .get_json(&format!("/api/assets/random?count={count}"), None, false)
            .await?;
        Ok(assets
            .into_iter()
            .map(|a| AssetCandidate { id: a.id })
            .collect())
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), SnapdriftError> {
        self.client
            .send_json(
                Method::PUT,
                &format!("/api/assets/{id}"),
                &UpdateAssetRequest {
                    is_favorite: favorite,
                },
                Some(id),
            )
            .await
    }

    async fn delete_asset(&self, id: &str) -> Result<(), SnapdriftError> {
        self.client
            .send_json(
                Method::DELETE,
                "/api/assets",
                &DeleteAssetsRequest {
                    force: true,
                    ids: vec![id.to_string()],
                },
                Some(id),
            )
            .await
    }

    async fn get_server_stats(&self) -> Result<ServerStats, SnapdriftError> {
        let stats: ServerStatisticsResponse = self
            .client
            .get_json("/api/server/statistics", None, true)
            .await?;
        Ok(stats.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapdrift_core::MediaType;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> ImmichGateway {
        let config = ImmichConfig {
            base_url: Some(server.uri()),
            api_key: Some("user-key".into()),
            admin_api_key: Some("admin-key".into()),
            timeout_secs: 5,
            max_retries: 0,
        };
        ImmichGateway::new(&config).unwrap()
    }

    #[test]
    fn missing_base_url_is_config_error() {
        let config = ImmichConfig {
            api_key: Some("k".into()),
            ..ImmichConfig::default()
        };
        let err = ImmichGateway::new(&config).err().unwrap();
        assert!(matches!(err, SnapdriftError::Config(ref m) if m.contains("base_url")));
    }

    #[tokio::test]
    async fn fetches_asset_info() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/assets/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "v1",
                "type": "VIDEO",
                "originalFileName": "clip.mov",
                "originalMimeType": "video/quicktime",
                "fileCreatedAt": "2022-12-24T20:00:00.000Z",
                "exifInfo": {"fileSizeInByte": 31000000}
            })))
            .mount(&server)
            .await;

        let info = gateway(&server).get_asset_info("v1").await.unwrap();
        assert_eq!(info.media_type, MediaType::Video);
        assert_eq!(info.byte_size, 31_000_000);
        assert_eq!(info.width, None);
    }

    #[tokio::test]
    async fn samples_random_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/assets/random"))
            .and(query_param("count", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "a"}, {"id": "b"}, {"id": "c"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let ids: Vec<String> = gateway(&server)
            .get_random_assets(3)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn non_list_random_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/assets/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"oops": 1})))
            .mount(&server)
            .await;

        assert!(gateway(&server).get_random_assets(1).await.is_err());
    }

    #[tokio::test]
    async fn favorite_and_delete_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/assets/a1"))
            .and(body_json(serde_json::json!({"isFavorite": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "a1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/assets"))
            .and(body_json(serde_json::json!({"force": true, "ids": ["a1"]})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let gw = gateway(&server);
        gw.set_favorite("a1", false).await.unwrap();
        gw.delete_asset("a1").await.unwrap();
    }

    #[tokio::test]
    async fn deleting_missing_asset_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/assets"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = gateway(&server).delete_asset("zz").await.unwrap_err();
        assert!(matches!(err, SnapdriftError::NotFound { ref id } if id == "zz"));
    }

    #[tokio::test]
    async fn server_stats_use_admin_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/server/statistics"))
            .and(wiremock::matchers::header("x-api-key", "admin-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "photos": 12034, "videos": 518, "usage": 1, "usageByUser": []
            })))
            .mount(&server)
            .await;

        let stats = gateway(&server).get_server_stats().await.unwrap();
        assert_eq!(stats.photo_count, 12_034);
        assert_eq!(stats.total(), 12_552);
    }

    #[tokio::test]
    async fn health_check_reports_unreachable_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/server/ping"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let status = gateway(&server).health_check().await.unwrap();
        assert!(matches!(status, HealthStatus::Unhealthy(_)));
    }
}
