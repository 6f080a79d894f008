//! Appointment scheduling handlers.

use crate::handlers::{
    get_str_param, get_u32_param, parse_payload, parse_surface, require_str_param,
};
use crate::server::AppState;
use ovum_client::records::{AppointmentCreate, AppointmentQuery, AppointmentUpdate};
use ovum_client::Surface;
use serde_json::Value;

pub async fn book_appointment(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let request: AppointmentCreate = parse_payload(params, "appointment")?;
    let appointment = state.client.book_appointment(&request).await?;
    Ok(serde_json::to_value(appointment)?)
}

pub async fn get_my_appointments(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let query = query_from_params(params);
    let page = state.client.my_appointments(&query).await?;
    Ok(serde_json::to_value(page)?)
}

pub async fn list_appointments(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let query = query_from_params(params);
    let page = state.client.list_appointments(&query).await?;
    Ok(serde_json::to_value(page)?)
}

pub async fn update_appointment(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let appointment_id = require_str_param(params, "appointment_id", "appointmentId")?;
    let update: AppointmentUpdate = parse_payload(params, "update")?;
    let result = state
        .client
        .update_appointment(surface, &appointment_id, &update)
        .await?;
    Ok(serde_json::to_value(result)?)
}

fn query_from_params(params: &Value) -> AppointmentQuery {
    AppointmentQuery {
        limit: get_u32_param(params, "limit", "limit"),
        cursor: get_str_param(params, "cursor", "cursor").map(String::from),
        kind: get_str_param(params, "kind", "type").map(String::from),
        status: get_str_param(params, "status", "status").map(String::from),
        date_from: get_str_param(params, "date_from", "dateFrom").map(String::from),
        date_to: get_str_param(params, "date_to", "dateTo").map(String::from),
        patient_id: get_str_param(params, "patient_id", "patientId").map(String::from),
    }
}
