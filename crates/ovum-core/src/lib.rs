//! Ovum Client - Headless client library for the egg bank clinic platform.
//!
//! This crate carries the client-side logic shared by the admin console
//! and the patient portal: typed wire records, two independent login
//! sessions, route guards, sequential frame uploads, evaluation watching,
//! and detection overlay geometry. It can be used programmatically
//! without any HTTP/RPC layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use ovum_client::OvumClient;
//!
//! #[tokio::main]
//! async fn main() -> ovum_client::Result<()> {
//!     let client = OvumClient::new()?;
//!
//!     client.login_admin("staff@clinic.example", "secret").await?;
//!
//!     // Page through the patient directory
//!     let patients = client.list_patients(1, 20, None, None, None).await?;
//!     println!("Found {} patients", patients.total_items());
//!
//!     // Evaluate a batch and watch it settle
//!     let watch_id = client.watch_evaluation("batch-1", false).await?;
//!     println!("Watching as {}", watch_id);
//!
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod net;
pub mod overlay;
pub mod records;
pub mod session;
pub mod upload;
pub mod watch;

mod api;

// Re-export commonly used types
pub use api::OvumClientBuilder;
pub use cancel::{CancellationToken, CancelledError};
pub use config::ApiConfig;
pub use error::{OvumError, Result};
pub use overlay::{
    class_color, detection_label, project_detections, rendered_image_box, OverlayBox, RectPercent,
    RenderedBox,
};
pub use session::{JwtClaims, RouteAccess, RouteRequirement, Session, SessionManager, Surface};
pub use upload::{BatchUploader, FrameSink, UploadFile, UploadState, UploadStatus};
pub use watch::{EvaluationWatcher, StatusSource, WatchPhase, WatchState};

use std::sync::Arc;

use net::ApiTransport;

/// Main entry point for programmatic access to the clinic backend.
///
/// One client carries two independent sessions: the console surface used
/// by admin and staff tooling, and the portal surface used by patient
/// flows. Domain methods live in `api/` submodules; everything here is
/// construction and shared accessors.
pub struct OvumClient {
    transport: Arc<ApiTransport>,
    uploader: BatchUploader,
    watcher: EvaluationWatcher,
}

impl OvumClient {
    /// Create a client configured from the environment.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a client against an explicit backend base URL.
    pub fn with_base_url(url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(url).build()
    }

    /// Builder for more control over initialization options.
    pub fn builder() -> OvumClientBuilder {
        OvumClientBuilder::new()
    }

    /// Active configuration.
    pub fn config(&self) -> &ApiConfig {
        self.transport.config()
    }

    /// The token store shared by both surfaces.
    pub fn session(&self) -> &SessionManager {
        self.transport.session()
    }
}

impl std::fmt::Debug for OvumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvumClient")
            .field("base_url", &self.config().base_url)
            .finish_non_exhaustive()
    }
}
