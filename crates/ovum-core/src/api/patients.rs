//! Patient directory methods on OvumClient.

use crate::error::Result;
use crate::records::{EvaluationHistory, Patient, PatientList, PatientUpdate, StatusResponse};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Patients
    // ========================================

    /// Fetch the profile of the patient logged into the portal.
    pub async fn current_patient(&self) -> Result<Patient> {
        self.transport.get_json(Surface::Client, "/patients/me").await
    }

    /// Page through the patient directory (console only).
    ///
    /// `role`, `status`, and `search` are backend-side filters; `search`
    /// matches name and email. The response envelope has changed shape
    /// across backend releases, so callers get a [`PatientList`] that
    /// absorbs both.
    pub async fn list_patients(
        &self,
        page: u32,
        limit: u32,
        role: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<PatientList> {
        let mut query = format!("page={}&limit={}", page, limit);
        if let Some(role) = role {
            query.push_str(&format!("&role={}", urlencoding::encode(role)));
        }
        if let Some(status) = status {
            query.push_str(&format!("&status={}", urlencoding::encode(status)));
        }
        if let Some(search) = search {
            query.push_str(&format!("&search={}", urlencoding::encode(search)));
        }
        let path = format!("/patients/?{}", query);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Fetch one patient by id (console only).
    pub async fn get_patient(&self, patient_id: &str) -> Result<Patient> {
        let path = format!("/patients/{}", patient_id);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Apply a partial update to a patient document.
    ///
    /// Patients may edit their own profile from the portal; console users
    /// may edit anyone, which is why the surface is a parameter.
    pub async fn update_patient(
        &self,
        surface: Surface,
        patient_id: &str,
        update: &PatientUpdate,
    ) -> Result<StatusResponse> {
        let path = format!("/patients/{}", patient_id);
        self.transport.patch_json(surface, &path, update).await
    }

    /// Soft-delete a patient (console only).
    pub async fn delete_patient(&self, patient_id: &str) -> Result<StatusResponse> {
        let path = format!("/patients/{}", patient_id);
        self.transport.delete_json(Surface::Admin, &path).await
    }

    /// Approved evaluation history for a patient, grouped by retrieval
    /// batch. Portals request their own id; the console may request any.
    pub async fn evaluation_history(
        &self,
        surface: Surface,
        patient_id: &str,
    ) -> Result<EvaluationHistory> {
        let path = format!("/patients/{}/evaluation-history", patient_id);
        self.transport.get_json(surface, &path).await
    }
}
