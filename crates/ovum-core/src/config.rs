//! Centralized configuration for the Ovum client.
//!
//! Holds the backend base URL (environment-configured), request timeouts,
//! and the constants shared by the transport, upload, and polling layers.

use crate::error::{OvumError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Ovum";
    pub const USER_AGENT: &'static str = "ovum-client/1.0";
    /// Environment variable holding the backend base URL.
    pub const BASE_URL_ENV_VAR: &'static str = "OVUM_API_BASE_URL";
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Upper bound on a single frame image fetch.
    pub const MAX_IMAGE_BYTES: u64 = 50 * 1024 * 1024;
    /// Frame images are served with `Cache-Control: max-age=3600`; the
    /// in-memory cache honors the same lifetime.
    pub const IMAGE_CACHE_TTL: Duration = Duration::from_secs(3600);
    pub const IMAGE_CACHE_CAPACITY: u64 = 128;
}

/// Evaluation poll loop configuration.
pub struct EvaluationConfig;

impl EvaluationConfig {
    /// Fixed cadence between status fetches.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
    /// Consecutive status-fetch failures tolerated before the watch stops.
    pub const MAX_CONSECUTIVE_POLL_FAILURES: u32 = 3;
}

/// Shared directory and file name configuration.
pub struct PathsConfig;

impl PathsConfig {
    pub const CONFIG_DIR_NAME: &'static str = "ovum";
    pub const TOKEN_FILENAME: &'static str = "tokens.json";
}

/// Resolved client configuration.
///
/// Built from the environment by [`ApiConfig::from_env`], or explicitly for
/// embedding. The base URL is validated once at construction; URL joining
/// afterwards is plain string composition against a normalized base.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Directory for the persisted token file. `None` uses the platform
    /// config directory.
    pub config_dir: Option<PathBuf>,
    /// Whether login tokens are persisted to disk across processes.
    pub persist_tokens: bool,
}

impl ApiConfig {
    /// Build a configuration from the environment.
    ///
    /// Reads [`AppConfig::BASE_URL_ENV_VAR`]; when unset, falls back to
    /// [`AppConfig::DEFAULT_BASE_URL`]. A set-but-invalid URL is an error.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(AppConfig::BASE_URL_ENV_VAR).ok();
        let base_url = resolve_base_url(raw.as_deref())?;
        Ok(Self::with_base_url(base_url))
    }

    /// Build a configuration with an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            connect_timeout: NetworkConfig::CONNECT_TIMEOUT,
            user_agent: AppConfig::USER_AGENT.to_string(),
            config_dir: None,
            persist_tokens: true,
        }
    }

    /// Absolute URL for an API path (`path` starts with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a server-provided image path to an absolute URL.
    ///
    /// Absolute `http(s)` URLs pass through untouched; anything else is
    /// joined to the base URL with a single separating slash.
    pub fn image_url(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let clean = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, clean)
    }
}

/// Validate and normalize a raw base URL, applying the default when absent.
pub(crate) fn resolve_base_url(raw: Option<&str>) -> Result<String> {
    let candidate = match raw {
        Some(value) if !value.trim().is_empty() => value.trim(),
        _ => AppConfig::DEFAULT_BASE_URL,
    };

    let parsed = url::Url::parse(candidate).map_err(|e| OvumError::Config {
        message: format!("Invalid backend base URL '{}': {}", candidate, e),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(OvumError::Config {
            message: format!(
                "Backend base URL must be http or https, got '{}'",
                candidate
            ),
        });
    }

    Ok(candidate.trim_end_matches('/').to_string())
}
