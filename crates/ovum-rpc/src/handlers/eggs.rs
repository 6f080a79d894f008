//! Frozen egg inventory handlers.

use crate::handlers::{parse_payload, parse_surface, require_str_param};
use crate::server::AppState;
use ovum_client::records::{EggRecordCreate, EggRecordUpdate};
use ovum_client::Surface;
use serde_json::Value;

pub async fn create_egg_record(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let request: EggRecordCreate = parse_payload(params, "record")?;
    let record = state.client.create_egg_record(&request).await?;
    Ok(serde_json::to_value(record)?)
}

pub async fn get_egg_record(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let record_id = require_str_param(params, "record_id", "recordId")?;
    let record = state.client.get_egg_record(&record_id).await?;
    Ok(serde_json::to_value(record)?)
}

pub async fn get_patient_egg_records(
    state: &AppState,
    params: &Value,
) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let records = state
        .client
        .patient_egg_records(surface, &patient_id)
        .await?;
    Ok(serde_json::to_value(records)?)
}

pub async fn get_batch_egg_records(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let records = state.client.batch_egg_records(&batch_id).await?;
    Ok(serde_json::to_value(records)?)
}

pub async fn update_egg_record(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let record_id = require_str_param(params, "record_id", "recordId")?;
    let update: EggRecordUpdate = parse_payload(params, "update")?;
    let response = state.client.update_egg_record(&record_id, &update).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn delete_egg_record(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let record_id = require_str_param(params, "record_id", "recordId")?;
    let response = state.client.delete_egg_record(&record_id).await?;
    Ok(serde_json::to_value(response)?)
}
