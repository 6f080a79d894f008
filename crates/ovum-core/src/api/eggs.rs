//! Egg record methods on OvumClient.

use crate::error::Result;
use crate::records::{EggRecord, EggRecordCreate, EggRecordUpdate, StatusResponse};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Egg records
    // ========================================

    /// Create an egg record under a batch (console only).
    pub async fn create_egg_record(&self, request: &EggRecordCreate) -> Result<EggRecord> {
        self.transport
            .post_json(Surface::Admin, "/egg-records/", request)
            .await
    }

    /// Fetch one egg record by id.
    pub async fn get_egg_record(&self, record_id: &str) -> Result<EggRecord> {
        let path = format!("/egg-records/{}", record_id);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Every egg record belonging to one patient. Portals request their
    /// own id; the console may request any.
    pub async fn patient_egg_records(
        &self,
        surface: Surface,
        patient_id: &str,
    ) -> Result<Vec<EggRecord>> {
        let path = format!("/egg-records/patient/{}", patient_id);
        self.transport.get_json(surface, &path).await
    }

    /// Every egg record catalogued from one batch (console only).
    pub async fn batch_egg_records(&self, batch_id: &str) -> Result<Vec<EggRecord>> {
        let path = format!("/egg-records/batch/{}", batch_id);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Apply a partial update to an egg record (console only).
    pub async fn update_egg_record(
        &self,
        record_id: &str,
        update: &EggRecordUpdate,
    ) -> Result<StatusResponse> {
        let path = format!("/egg-records/{}", record_id);
        self.transport.patch_json(Surface::Admin, &path, update).await
    }

    /// Delete an egg record (console only).
    pub async fn delete_egg_record(&self, record_id: &str) -> Result<StatusResponse> {
        let path = format!("/egg-records/{}", record_id);
        self.transport.delete_json(Surface::Admin, &path).await
    }
}
