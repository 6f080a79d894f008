//! Staff roster handlers. Every method needs an admin session.

use crate::handlers::{parse_payload, require_str_param};
use crate::server::AppState;
use ovum_client::records::{StaffCreate, StaffUpdate};
use serde_json::Value;

pub async fn create_staff(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let request: StaffCreate = parse_payload(params, "staff")?;
    let staff = state.client.create_staff(&request).await?;
    Ok(serde_json::to_value(staff)?)
}

pub async fn list_staff(state: &AppState, _params: &Value) -> ovum_client::Result<Value> {
    let roster = state.client.list_staff().await?;
    Ok(serde_json::to_value(roster)?)
}

pub async fn get_staff(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let staff_id = require_str_param(params, "staff_id", "staffId")?;
    let staff = state.client.get_staff(&staff_id).await?;
    Ok(serde_json::to_value(staff)?)
}

pub async fn update_staff(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let staff_id = require_str_param(params, "staff_id", "staffId")?;
    let update: StaffUpdate = parse_payload(params, "update")?;
    let staff = state.client.update_staff(&staff_id, &update).await?;
    Ok(serde_json::to_value(staff)?)
}

pub async fn deactivate_staff(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let staff_id = require_str_param(params, "staff_id", "staffId")?;
    let response = state.client.deactivate_staff(&staff_id).await?;
    Ok(serde_json::to_value(response)?)
}
