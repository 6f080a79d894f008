//! Frame and upload handlers.

use crate::handlers::{parse_payload, parse_surface, require_str_param};
use crate::server::AppState;
use base64::Engine as _;
use ovum_client::records::frame::count_by_maturity;
use ovum_client::records::{Frame, FrameUpdate};
use ovum_client::{OvumError, Surface, UploadFile};
use serde_json::{json, Value};

pub async fn get_batch_frames(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let frames = state.client.batch_frames(surface, &batch_id).await?;
    Ok(serde_json::to_value(frames)?)
}

pub async fn update_frame(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let frame_id = require_str_param(params, "frame_id", "frameId")?;
    let update: FrameUpdate = parse_payload(params, "update")?;
    let response = state.client.update_frame(&frame_id, &update).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn delete_frame(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let frame_id = require_str_param(params, "frame_id", "frameId")?;
    let response = state.client.delete_frame(&frame_id).await?;
    Ok(serde_json::to_value(response)?)
}

/// Fetch a frame image through the authenticated view endpoint and return
/// it base64-encoded for transport inside the JSON envelope.
pub async fn get_frame_image(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Admin)?;
    let frame_id = require_str_param(params, "frame_id", "frameId")?;
    let bytes = state.client.frame_image(surface, &frame_id).await?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(json!({
        "frameId": frame_id,
        "data": encoded,
    }))
}

/// Count MII/MI verdicts over a caller-supplied frame list. Pure; used by
/// list views that already hold the frames.
pub async fn count_frame_maturity(_state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let frames: Vec<Frame> = parse_payload(params, "frames")?;
    let (mii, mi) = count_by_maturity(&frames);
    Ok(json!({"mii": mii, "mi": mi}))
}

/// Start a background upload of local image files into a batch. Returns an
/// upload id to poll with `get_upload_progress`.
pub async fn upload_frames(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let batch_id = require_str_param(params, "batch_id", "batchId")?;
    let paths = params
        .get("paths")
        .and_then(|v| v.as_array())
        .ok_or_else(|| OvumError::InvalidParams {
            message: "Missing required parameter: paths".to_string(),
        })?;

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_str().ok_or_else(|| OvumError::InvalidParams {
            message: "paths entries must be strings".to_string(),
        })?;
        files.push(UploadFile::from_path(path).await?);
    }

    let upload_id = state.client.upload_frames(&batch_id, files).await?;
    Ok(json!({"uploadId": upload_id}))
}

pub async fn get_upload_progress(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let upload_id = require_str_param(params, "upload_id", "uploadId")?;
    let progress = state.client.upload_progress(&upload_id).await;
    Ok(serde_json::to_value(progress)?)
}

pub async fn cancel_upload(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let upload_id = require_str_param(params, "upload_id", "uploadId")?;
    let cancelled = state.client.cancel_upload(&upload_id).await;
    Ok(json!({"cancelled": cancelled}))
}

pub async fn clear_upload(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let upload_id = require_str_param(params, "upload_id", "uploadId")?;
    let cleared = state.client.clear_upload(&upload_id).await;
    Ok(json!({"cleared": cleared}))
}
