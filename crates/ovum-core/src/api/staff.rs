//! Staff management methods on OvumClient. Console only; the backend
//! additionally requires the admin role for every call here.

use crate::error::Result;
use crate::records::{MessageResponse, Staff, StaffCreate, StaffUpdate};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Staff
    // ========================================

    /// Create a staff or admin account.
    pub async fn create_staff(&self, request: &StaffCreate) -> Result<Staff> {
        self.transport
            .post_json(Surface::Admin, "/staffs/", request)
            .await
    }

    /// List every staff document.
    pub async fn list_staff(&self) -> Result<Vec<Staff>> {
        self.transport.get_json(Surface::Admin, "/staffs/").await
    }

    /// Fetch one staff member by id.
    pub async fn get_staff(&self, staff_id: &str) -> Result<Staff> {
        let path = format!("/staffs/{}", staff_id);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Apply a partial update and return the merged document.
    pub async fn update_staff(&self, staff_id: &str, update: &StaffUpdate) -> Result<Staff> {
        let path = format!("/staffs/{}", staff_id);
        self.transport.patch_json(Surface::Admin, &path, update).await
    }

    /// Deactivate a staff account. The document is kept with an
    /// `inactive` status rather than deleted.
    pub async fn deactivate_staff(&self, staff_id: &str) -> Result<MessageResponse> {
        let path = format!("/staffs/{}", staff_id);
        self.transport.delete_json(Surface::Admin, &path).await
    }
}
