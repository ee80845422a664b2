// SPDX-FileCopyrightText: 2026 Snapdrift Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Immich REST API.
//!
//! Provides [`ImmichClient`] which handles authentication, JSON and binary
//! responses, status mapping, and transient error retry for reads.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use snapdrift_core::SnapdriftError;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for one Immich server.
///
/// Reads (GET) retry on 429, 500, 502, 503, 504 and connection failures;
/// writes are sent once.
#[derive(Debug, Clone)]
pub struct ImmichClient {
    client: reqwest::Client,
    base_url: String,
    admin_key: Option<HeaderValue>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ImmichClient {
    /// Creates a client authenticated with `api_key`.
    ///
    /// `admin_api_key` is used only for admin endpoints such as server
    /// statistics; without it those requests use `api_key`.
    pub fn new(
        base_url: &str,
        api_key: &str,
        admin_api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SnapdriftError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, header_value(api_key, "API key")?);
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let admin_key = admin_api_key
            .map(|k| header_value(k, "admin API key"))
            .transpose()?;

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SnapdriftError::Upstream {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key,
            max_retries: 1,
            retry_delay: Duration::from_secs(1),
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and decode a JSON body.
    ///
    /// `resource` names the asset for 404 mapping; `None` means a 404 is an
    /// ordinary upstream failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: Option<&str>,
        admin: bool,
    ) -> Result<T, SnapdriftError> {
        let response = self.get_with_retry(path, resource, admin).await?;
        let body = response.bytes().await.map_err(|e| SnapdriftError::Upstream {
            message: format!("failed to read response body from {path}: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_slice(&body).map_err(|e| SnapdriftError::Upstream {
            message: format!("failed to parse response from {path}: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// GET `path` and return the raw body.
    pub async fn get_bytes(&self, path: &str, resource: Option<&str>) -> Result<Vec<u8>, SnapdriftError> {
        let response = self.get_with_retry(path, resource, false).await?;
        let body = response.bytes().await.map_err(|e| SnapdriftError::Upstream {
            message: format!("failed to download {path}: {e}"),
            source: Some(Box::new(e)),
        })?;
        Ok(body.to_vec())
    }

    /// Send a JSON body with `method` once, discarding the response body.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        resource: Option<&str>,
    ) -> Result<(), SnapdriftError> {
        let request = self.client.request(method, self.url(path)).json(body);
        let response = send(request, path).await?;
        check_status(response, path, resource).await.map(|_| ())
    }

    async fn get_with_retry(
        &self,
        path: &str,
        resource: Option<&str>,
        admin: bool,
    ) -> Result<Response, SnapdriftError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let mut request = self.client.get(self.url(path));
            if admin {
                if let Some(key) = &self.admin_key {
                    request = request.header(API_KEY_HEADER, key.clone());
                }
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) if (e.is_connect() || e.is_timeout()) && attempt < self.max_retries => {
                    warn!(path, error = %e, "connection failed, will retry");
                    last_error = Some(request_error(e, path));
                    continue;
                }
                Err(e) => return Err(request_error(e, path)),
            };

            let status = response.status();
            debug!(status = %status, attempt, path, "response received");

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(SnapdriftError::upstream(format!(
                    "{path} returned {status}: {body}"
                )));
                continue;
            }

            return check_status(response, path, resource).await;
        }

        Err(last_error.unwrap_or_else(|| {
            SnapdriftError::upstream(format!("{path} failed after retries"))
        }))
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue, SnapdriftError> {
    let mut value = HeaderValue::from_str(value)
        .map_err(|e| SnapdriftError::Config(format!("invalid {what} header value: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

fn request_error(e: reqwest::Error, path: &str) -> SnapdriftError {
    SnapdriftError::Upstream {
        message: format!("HTTP request to {path} failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn send(request: RequestBuilder, path: &str) -> Result<Response, SnapdriftError> {
    request.send().await.map_err(|e| request_error(e, path))
}

/// Pass successful responses through; map 404 and everything else to errors.
async fn check_status(
    response: Response,
    path: &str,
    resource: Option<&str>,
) -> Result<Response, SnapdriftError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = resource {
            return Err(SnapdriftError::NotFound { id: id.to_string() });
        }
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_err) => format!("Immich API error ({status}) on {path}: {}", api_err.describe()),
        Err(_) => format!("{path} returned {status}: {body}"),
    };
    Err(SnapdriftError::upstream(message))
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}
