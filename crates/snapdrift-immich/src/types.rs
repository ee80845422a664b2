// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Immich REST API.
//!
//! Only the fields Snapdrift reads are modelled; everything else in the
//! responses is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapdrift_core::{AssetInfo, MediaType, ServerStats, SnapdriftError};

/// `GET /api/assets/{id}` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub id: String,
    /// `IMAGE`, `VIDEO`, `AUDIO` or `OTHER`.
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub original_file_name: String,
    #[serde(default, alias = "contentType")]
    pub original_mime_type: Option<String>,
    pub file_created_at: DateTime<Utc>,
    #[serde(default)]
    pub exif_info: Option<ExifInfo>,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExifInfo {
    #[serde(default)]
    pub file_size_in_byte: Option<u64>,
    #[serde(default)]
    pub exif_image_width: Option<u32>,
    #[serde(default)]
    pub exif_image_height: Option<u32>,
}

impl TryFrom<AssetResponse> for AssetInfo {
    type Error = SnapdriftError;

    /// Fails for non-photo/video assets and assets without a known size.
    fn try_from(asset: AssetResponse) -> Result<Self, Self::Error> {
        let media_type: MediaType = asset.asset_type.parse().map_err(|_| {
            SnapdriftError::upstream(format!(
                "asset {} has unsupported type `{}`",
                asset.id, asset.asset_type
            ))
        })?;

        let exif = asset.exif_info.unwrap_or_default();
        let byte_size = exif.file_size_in_byte.ok_or_else(|| {
            SnapdriftError::upstream(format!("asset {} has no file size", asset.id))
        })?;

        Ok(AssetInfo {
            id: asset.id,
            original_file_name: asset.original_file_name,
            content_type: asset.original_mime_type.unwrap_or_default(),
            media_type,
            byte_size,
            created_at: asset.file_created_at,
            width: exif.exif_image_width,
            height: exif.exif_image_height,
        })
    }
}

/// One element of the `GET /api/assets/random` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RandomAsset {
    pub id: String,
}

/// `GET /api/server/statistics` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerStatisticsResponse {
    #[serde(default)]
    pub photos: u64,
    #[serde(default)]
    pub videos: u64,
}

impl From<ServerStatisticsResponse> for ServerStats {
    fn from(stats: ServerStatisticsResponse) -> Self {
        ServerStats {
            photo_count: stats.photos,
            video_count: stats.videos,
        }
    }
}

/// `GET /api/server/ping` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PingResponse {
    pub res: String,
}

/// `PUT /api/assets/{id}` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetRequest {
    pub is_favorite: bool,
}

/// `DELETE /api/assets` body.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteAssetsRequest {
    /// Skip the trash and delete permanently.
    pub force: bool,
    pub ids: Vec<String>,
}

/// Error body returned by the server on 4xx/5xx.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    /// `message` is a string or a list of validation strings.
    pub fn describe(&self) -> String {
        let message = match &self.message {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            _ => String::new(),
        };
        match (&self.error, message.is_empty()) {
            (Some(error), false) => format!("{error}: {message}"),
            (Some(error), true) => error.clone(),
            (None, _) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset_json() -> serde_json::Value {
        serde_json::json!({
            "id": "7d1f",
            "type": "IMAGE",
            "originalFileName": "IMG_0420.HEIC",
            "originalMimeType": "image/heic",
            "fileCreatedAt": "2023-08-01T17:03:12.000Z",
            "isFavorite": true,
            "ownerId": "someone",
            "exifInfo": {
                "fileSizeInByte": 2483112,
                "exifImageWidth": 4032,
                "exifImageHeight": 3024,
                "make": "Apple"
            }
        })
    }

    #[test]
    fn asset_response_converts_to_info() {
        let resp: AssetResponse = serde_json::from_value(asset_json()).unwrap();
        assert!(resp.is_favorite);
        let info = AssetInfo::try_from(resp).unwrap();
        assert_eq!(info.id, "7d1f");
        assert_eq!(info.media_type, MediaType::Image);
        assert_eq!(info.byte_size, 2_483_112);
        assert_eq!(info.content_type, "image/heic");
        assert_eq!(info.width, Some(4032));
        assert_eq!(info.created_at.to_rfc3339(), "2023-08-01T17:03:12+00:00");
    }

    #[test]
    fn content_type_alias_is_accepted() {
        let mut json = asset_json();
        let obj = json.as_object_mut().unwrap();
        obj.remove("originalMimeType");
        obj.insert("contentType".into(), "video/mp4".into());
        obj.insert("type".into(), "VIDEO".into());
        let info = AssetInfo::try_from(serde_json::from_value::<AssetResponse>(json).unwrap()).unwrap();
        assert_eq!(info.content_type, "video/mp4");
        assert_eq!(info.media_type, MediaType::Video);
    }

    #[test]
    fn missing_size_is_rejected() {
        let mut json = asset_json();
        json.as_object_mut().unwrap().remove("exifInfo");
        let resp: AssetResponse = serde_json::from_value(json).unwrap();
        assert!(AssetInfo::try_from(resp).is_err());
    }

    #[test]
    fn audio_assets_are_rejected() {
        let mut json = asset_json();
        json.as_object_mut().unwrap().insert("type".into(), "AUDIO".into());
        let resp: AssetResponse = serde_json::from_value(json).unwrap();
        let err = AssetInfo::try_from(resp).unwrap_err();
        assert!(err.to_string().contains("AUDIO"));
    }

    #[test]
    fn request_bodies_use_api_casing() {
        let body = serde_json::to_value(UpdateAssetRequest { is_favorite: true }).unwrap();
        assert_eq!(body, serde_json::json!({"isFavorite": true}));
        let body = serde_json::to_value(DeleteAssetsRequest {
            force: true,
            ids: vec!["a".into()],
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"force": true, "ids": ["a"]}));
    }

    #[test]
    fn error_body_description() {
        let err: ApiErrorResponse = serde_json::from_value(serde_json::json!({
            "message": ["id must be a UUID"], "error": "Bad Request", "statusCode": 400
        }))
        .unwrap();
        assert_eq!(err.describe(), "Bad Request: id must be a UUID");
    }
}
