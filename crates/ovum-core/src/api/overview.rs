//! Aggregate view methods on OvumClient: the patient journey, the console
//! dashboard, and the backend health probe.

use crate::error::Result;
use crate::records::{DashboardOverview, Journey};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Overviews
    // ========================================

    /// The logged-in patient's journey: stage flags plus their
    /// appointments, batches, and egg records in one response.
    pub async fn journey(&self) -> Result<Journey> {
        self.transport.get_json(Surface::Client, "/journey/me").await
    }

    /// Console dashboard counters and trends (admin and staff).
    pub async fn dashboard_overview(&self) -> Result<DashboardOverview> {
        self.transport
            .get_json(Surface::Admin, "/admin/dashboard/overview")
            .await
    }

    /// Probe the backend root endpoint. Useful as a connectivity check
    /// before login, so no token is required.
    pub async fn backend_health(&self) -> Result<serde_json::Value> {
        self.transport.get_json(Surface::Client, "/").await
    }
}
