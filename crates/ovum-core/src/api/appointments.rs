//! Appointment scheduling methods on OvumClient.

use crate::error::{OvumError, Result};
use crate::records::{
    Appointment, AppointmentCreate, AppointmentPage, AppointmentQuery, AppointmentUpdate,
    AppointmentUpdateResult, APPOINTMENT_KINDS,
};
use crate::session::Surface;
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Appointments
    // ========================================

    /// Book an appointment for the logged-in patient. The backend rejects
    /// bookings until the medical history form is complete.
    pub async fn book_appointment(&self, request: &AppointmentCreate) -> Result<Appointment> {
        if !APPOINTMENT_KINDS.contains(&request.kind.as_str()) {
            return Err(OvumError::Validation {
                field: "type".to_string(),
                message: format!(
                    "Appointment type must be one of: {}",
                    APPOINTMENT_KINDS.join(", ")
                ),
            });
        }
        self.transport
            .post_json(Surface::Client, "/appointments/", request)
            .await
    }

    /// Cursor-paged listing of the logged-in patient's appointments.
    pub async fn my_appointments(&self, query: &AppointmentQuery) -> Result<AppointmentPage> {
        let path = with_query("/appointments/my", query);
        self.transport.get_json(Surface::Client, &path).await
    }

    /// Cursor-paged listing across all patients (console only).
    pub async fn list_appointments(&self, query: &AppointmentQuery) -> Result<AppointmentPage> {
        let path = with_query("/appointments/", query);
        self.transport.get_json(Surface::Admin, &path).await
    }

    /// Update an appointment.
    ///
    /// From the portal this is limited to the patient's own appointments
    /// and may not assign staff; the backend enforces both.
    pub async fn update_appointment(
        &self,
        surface: Surface,
        appointment_id: &str,
        update: &AppointmentUpdate,
    ) -> Result<AppointmentUpdateResult> {
        let path = format!("/appointments/{}", appointment_id);
        self.transport.patch_json(surface, &path, update).await
    }
}

fn with_query(path: &str, query: &AppointmentQuery) -> String {
    let rendered = query.to_query_string();
    if rendered.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, rendered)
    }
}
