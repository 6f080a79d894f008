//! Evaluation run handlers.

use crate::handlers::{get_bool_param, require_str_param};
use crate::server::AppState;
use serde_json::{json, Value};

pub async fn start_evaluation(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let response = state.client.start_evaluation(&batch_id).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn re_evaluate(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let response = state.client.re_evaluate(&batch_id).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn get_evaluation_status(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let status = state.client.evaluation_status(&batch_id).await?;
    Ok(serde_json::to_value(status)?)
}

/// Kick off an evaluation (or re-run with `re_run: true`) and follow it in
/// the background. Returns a watch id to poll with `get_watch_progress`.
pub async fn watch_evaluation(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let re_run = get_bool_param(params, "re_run", "reRun").unwrap_or(false);
    let watch_id = state.client.watch_evaluation(&batch_id, re_run).await?;
    Ok(json!({"watchId": watch_id}))
}

pub async fn get_watch_progress(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let watch_id = require_str_param(params, "watch_id", "watchId")?;
    let progress = state.client.watch_progress(&watch_id).await;
    Ok(serde_json::to_value(progress)?)
}

pub async fn cancel_watch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let watch_id = require_str_param(params, "watch_id", "watchId")?;
    let cancelled = state.client.cancel_watch(&watch_id).await;
    Ok(json!({"cancelled": cancelled}))
}

pub async fn clear_watch(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let watch_id = require_str_param(params, "watch_id", "watchId")?;
    let cleared = state.client.clear_watch(&watch_id).await;
    Ok(json!({"cleared": cleared}))
}
