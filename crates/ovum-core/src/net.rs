//! Authenticated HTTP transport for the clinic backend.
//!
//! One transport serves both portal surfaces: every request picks up the
//! surface's bearer token from the session, non-2xx responses map to
//! typed errors carrying the server's `detail` message, and a 401
//! invalidates the stored token so the route guard redirects on the next
//! check. Frame image bytes go through a separate client with no overall
//! deadline, plus a small in-memory cache mirroring the server's
//! `Cache-Control: max-age=3600`.

use crate::config::{ApiConfig, NetworkConfig};
use crate::error::{OvumError, Result};
use crate::session::{SessionManager, Surface};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use mini_moka::sync::Cache;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// HTTP transport bound to one backend and one session.
pub struct ApiTransport {
    config: ApiConfig,
    session: SessionManager,
    /// JSON endpoints, with an overall request deadline.
    client: Client,
    /// Image fetches: connect timeout only, so a slow transfer is not
    /// killed mid-stream.
    image_client: Client,
    image_cache: Cache<String, Bytes>,
}

impl ApiTransport {
    pub fn new(config: ApiConfig, session: SessionManager) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OvumError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: Some(e.to_string()),
            })?;

        let image_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OvumError::Network {
                message: format!("Failed to create image HTTP client: {}", e),
                cause: Some(e.to_string()),
            })?;

        Ok(Self {
            config,
            session,
            client,
            image_client,
            image_cache: Cache::builder()
                .time_to_live(NetworkConfig::IMAGE_CACHE_TTL)
                .max_capacity(NetworkConfig::IMAGE_CACHE_CAPACITY)
                .build(),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    // ========================================================================
    // JSON endpoints
    // ========================================================================

    pub async fn get_json<T: DeserializeOwned>(&self, surface: Surface, path: &str) -> Result<T> {
        let request = self.client.get(self.config.endpoint(path));
        self.execute(surface, path, request).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.config.endpoint(path)).json(body);
        self.execute(surface, path, request).await
    }

    /// POST without a body (job triggers and similar).
    pub async fn post_empty<T: DeserializeOwned>(&self, surface: Surface, path: &str) -> Result<T> {
        let request = self.client.post(self.config.endpoint(path));
        self.execute(surface, path, request).await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.patch(self.config.endpoint(path)).json(body);
        self.execute(surface, path, request).await
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
    ) -> Result<T> {
        let request = self.client.delete(self.config.endpoint(path));
        self.execute(surface, path, request).await
    }

    /// Upload one file as multipart form data under the `file` field.
    pub async fn post_multipart_file<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<T> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| OvumError::Validation {
                field: "file".to_string(),
                message: format!("Invalid MIME type '{}': {}", mime_type, e),
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self.client.post(self.config.endpoint(path)).multipart(form);
        self.execute(surface, path, request).await
    }

    // ========================================================================
    // Frame images
    // ========================================================================

    /// Fetch a frame's image bytes through the authenticated view
    /// endpoint, with a cache-busting timestamp query and an in-memory
    /// cache on the frame id.
    pub async fn fetch_frame_image(&self, surface: Surface, frame_id: &str) -> Result<Bytes> {
        let cache_key = frame_id.to_string();
        if let Some(bytes) = self.image_cache.get(&cache_key) {
            debug!("Frame image cache hit for {}", frame_id);
            return Ok(bytes);
        }

        let url = format!(
            "{}?t={}",
            self.config.endpoint(&format!("/frames/view/{}", frame_id)),
            chrono::Utc::now().timestamp_millis()
        );
        let request = self.authorize(surface, self.image_client.get(&url)).await;
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.error_for_status(surface, status, &body).await);
        }

        if let Some(length) = response.content_length() {
            if length > NetworkConfig::MAX_IMAGE_BYTES {
                return Err(OvumError::Other(format!(
                    "Frame image {} is {} bytes, over the {} byte limit",
                    frame_id,
                    length,
                    NetworkConfig::MAX_IMAGE_BYTES
                )));
            }
        }

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if (buffer.len() + chunk.len()) as u64 > NetworkConfig::MAX_IMAGE_BYTES {
                return Err(OvumError::Other(format!(
                    "Frame image {} exceeded the {} byte limit",
                    frame_id,
                    NetworkConfig::MAX_IMAGE_BYTES
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        let bytes = buffer.freeze();
        self.image_cache.insert(cache_key, bytes.clone());
        Ok(bytes)
    }

    /// Drop a cached image, e.g. after the frame was re-evaluated.
    pub fn invalidate_frame_image(&self, frame_id: &str) {
        self.image_cache.invalidate(&frame_id.to_string());
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn execute<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let request = self.authorize(surface, request).await;
        let response = request.send().await?;
        self.handle_json_response(surface, path, response).await
    }

    /// Attach the surface's bearer token, when one is stored.
    async fn authorize(&self, surface: Surface, request: RequestBuilder) -> RequestBuilder {
        match self.session.token(surface).await {
            Some(token) => request.header("Authorization", auth_header_value(&token)),
            None => request,
        }
    }

    async fn handle_json_response<T: DeserializeOwned>(
        &self,
        surface: Surface,
        path: &str,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let error = self.error_for_status(surface, status, &body).await;
        warn!("{} {} -> {}", surface.as_str(), path, error);
        Err(error)
    }

    /// Map a non-2xx status and body to a typed error. A 401 also
    /// discards the surface's stored token.
    async fn error_for_status(
        &self,
        surface: Surface,
        status: StatusCode,
        body: &str,
    ) -> OvumError {
        let detail = parse_detail(body);
        match status {
            StatusCode::UNAUTHORIZED => {
                self.session.handle_unauthorized(surface).await;
                OvumError::Unauthorized { detail }
            }
            StatusCode::FORBIDDEN => OvumError::Forbidden { detail },
            StatusCode::NOT_FOUND => OvumError::NotFound { detail },
            _ => OvumError::Api {
                status: status.as_u16(),
                detail,
            },
        }
    }
}

/// `Authorization` header value for a bearer token.
pub fn auth_header_value(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Extract the `detail` string from an error body, when it is one.
fn parse_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(|detail| detail.to_string())
}
