//! Patient record handlers.

use crate::handlers::{
    get_str_param, get_u32_param, parse_payload, parse_surface, require_str_param,
};
use crate::server::AppState;
use ovum_client::records::PatientUpdate;
use ovum_client::Surface;
use serde_json::Value;

pub async fn get_current_patient(state: &AppState, _params: &Value) -> ovum_client::Result<Value> {
    let patient = state.client.current_patient().await?;
    Ok(serde_json::to_value(patient)?)
}

pub async fn list_patients(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let page = get_u32_param(params, "page", "page").unwrap_or(1);
    let limit = get_u32_param(params, "limit", "limit").unwrap_or(20);
    let role = get_str_param(params, "role", "role");
    let status = get_str_param(params, "status", "status");
    let search = get_str_param(params, "search", "search");
    let list = state
        .client
        .list_patients(page, limit, role, status, search)
        .await?;
    Ok(serde_json::to_value(list)?)
}

pub async fn get_patient(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let patient = state.client.get_patient(&patient_id).await?;
    Ok(serde_json::to_value(patient)?)
}

pub async fn update_patient(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let update: PatientUpdate = parse_payload(params, "update")?;
    let response = state
        .client
        .update_patient(surface, &patient_id, &update)
        .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn delete_patient(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let response = state.client.delete_patient(&patient_id).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn get_evaluation_history(
    state: &AppState,
    params: &Value,
) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let history = state
        .client
        .evaluation_history(surface, &patient_id)
        .await?;
    Ok(serde_json::to_value(history)?)
}
