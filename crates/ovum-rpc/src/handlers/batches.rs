//! Retrieval batch handlers.

use crate::handlers::{parse_payload, parse_surface, require_str_param};
use crate::server::AppState;
use ovum_client::records::{ApproveEligibilityRequest, BatchCreate, BatchUpdate};
use ovum_client::Surface;
use serde_json::Value;

pub async fn create_batch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let request: BatchCreate = parse_payload(params, "batch")?;
    let batch = state.client.create_batch(&request).await?;
    Ok(serde_json::to_value(batch)?)
}

pub async fn get_batch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let batch = state.client.get_batch(surface, &batch_id).await?;
    Ok(serde_json::to_value(batch)?)
}

pub async fn get_patient_batches(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let patient_id = require_str_param(params, "patient_id", "patientId")?;
    let batches = state.client.patient_batches(surface, &patient_id).await?;
    Ok(serde_json::to_value(batches)?)
}

pub async fn update_batch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let update: BatchUpdate = parse_payload(params, "update")?;
    let response = state.client.update_batch(&batch_id, &update).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn delete_batch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let response = state.client.delete_batch(&batch_id).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn approve_eligibility(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let request: ApproveEligibilityRequest = parse_payload(params, "approval")?;
    let response = state
        .client
        .approve_eligibility(&batch_id, &request)
        .await?;
    Ok(serde_json::to_value(response)?)
}

/// Client-side eligibility suggestion for a batch; `null` until the batch
/// has evaluated frames and a known patient role.
pub async fn suggest_batch_eligibility(
    state: &AppState,
    params: &Value,
) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let suggestion = state.client.batch_eligibility_suggestion(&batch_id).await?;
    Ok(serde_json::to_value(suggestion)?)
}
