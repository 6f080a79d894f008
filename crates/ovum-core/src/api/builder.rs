//! Builder for configuring OvumClient initialization.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{self, ApiConfig};
use crate::error::Result;
use crate::net::ApiTransport;
use crate::session::SessionManager;
use crate::upload::BatchUploader;
use crate::watch::EvaluationWatcher;
use crate::OvumClient;

/// Builder for configuring OvumClient initialization.
///
/// Use this for more control over client options.
///
/// # Example
///
/// ```rust,ignore
/// use ovum_client::OvumClient;
///
/// let client = OvumClient::builder()
///     .base_url("https://api.clinic.example")
///     .ephemeral_tokens()
///     .build()?;
/// ```
pub struct OvumClientBuilder {
    base_url: Option<String>,
    config_dir: Option<PathBuf>,
    persist_tokens: bool,
}

impl OvumClientBuilder {
    pub(crate) fn new() -> Self {
        Self {
            base_url: None,
            config_dir: None,
            persist_tokens: true,
        }
    }

    /// Set the backend base URL instead of reading it from the environment.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the directory holding the persisted token file.
    ///
    /// Default: the platform config directory.
    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Keep login tokens in memory only, never writing them to disk.
    ///
    /// Default: tokens are persisted so separate processes share a login.
    pub fn ephemeral_tokens(mut self) -> Self {
        self.persist_tokens = false;
        self
    }

    /// Validate the configuration and create the client.
    pub fn build(self) -> Result<OvumClient> {
        let base_url = match self.base_url {
            Some(url) => config::resolve_base_url(Some(&url))?,
            None => return self.build_from_env(),
        };

        let mut api_config = ApiConfig::with_base_url(base_url);
        api_config.config_dir = self.config_dir;
        api_config.persist_tokens = self.persist_tokens;
        Self::assemble(api_config)
    }

    fn build_from_env(self) -> Result<OvumClient> {
        let mut api_config = ApiConfig::from_env()?;
        api_config.config_dir = self.config_dir;
        api_config.persist_tokens = self.persist_tokens;
        Self::assemble(api_config)
    }

    fn assemble(api_config: ApiConfig) -> Result<OvumClient> {
        let session = if api_config.persist_tokens {
            SessionManager::new(api_config.config_dir.as_deref(), true)?
        } else {
            SessionManager::ephemeral()
        };
        let transport = Arc::new(ApiTransport::new(api_config, session)?);

        Ok(OvumClient {
            transport,
            uploader: BatchUploader::new(),
            watcher: EvaluationWatcher::new(),
        })
    }
}
