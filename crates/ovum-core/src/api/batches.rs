//! Retrieval batch methods on OvumClient.

use crate::error::Result;
use crate::records::{
    suggest_eligibility, ApproveEligibilityRequest, Batch, BatchCreate, BatchUpdate,
    EligibilitySuggestion, StatusResponse,
};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Retrieval batches
    // ========================================

    /// Create a retrieval batch for a patient (console only).
    pub async fn create_batch(&self, request: &BatchCreate) -> Result<Batch> {
        self.transport
            .post_json(Surface::Admin, "/batches/", request)
            .await
    }

    /// Fetch one batch, enriched server-side with patient name and the
    /// denormalized result summary.
    pub async fn get_batch(&self, surface: Surface, batch_id: &str) -> Result<Batch> {
        let path = format!("/batches/{}", batch_id);
        self.transport.get_json(surface, &path).await
    }

    /// All batches belonging to one patient, newest first.
    pub async fn patient_batches(&self, surface: Surface, patient_id: &str) -> Result<Vec<Batch>> {
        let path = format!("/batches/patient/{}", patient_id);
        self.transport.get_json(surface, &path).await
    }

    /// Apply a partial update to a batch (console only).
    pub async fn update_batch(
        &self,
        batch_id: &str,
        update: &BatchUpdate,
    ) -> Result<StatusResponse> {
        let path = format!("/batches/{}", batch_id);
        self.transport.patch_json(Surface::Admin, &path, update).await
    }

    /// Delete a batch and its frames (console only).
    pub async fn delete_batch(&self, batch_id: &str) -> Result<StatusResponse> {
        let path = format!("/batches/{}", batch_id);
        self.transport.delete_json(Surface::Admin, &path).await
    }

    /// Record an eligibility decision on an evaluated batch.
    pub async fn approve_eligibility(
        &self,
        batch_id: &str,
        request: &ApproveEligibilityRequest,
    ) -> Result<StatusResponse> {
        let path = format!("/batches/{}/approve-eligibility", batch_id);
        self.transport.post_json(Surface::Admin, &path, request).await
    }

    /// Recompute the client-side eligibility suggestion for a batch from
    /// its denormalized counts and the owning patient's role.
    ///
    /// Returns `None` when the batch has no evaluated frames yet or the
    /// patient role is unknown, mirroring what the backend stores.
    pub async fn batch_eligibility_suggestion(
        &self,
        batch_id: &str,
    ) -> Result<Option<EligibilitySuggestion>> {
        let batch = self.get_batch(Surface::Admin, batch_id).await?;
        let role = match &batch.patient_role {
            Some(role) => role.clone(),
            None => {
                let patient = self.get_patient(&batch.patient_id).await?;
                patient.role.unwrap_or_default()
            }
        };
        let summary = &batch.result_summary;
        Ok(suggest_eligibility(
            &role,
            summary.total_frames,
            summary.mii.unwrap_or(0),
            summary.mi.unwrap_or(0),
        ))
    }
}
