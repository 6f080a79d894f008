//! Journey, dashboard, and backend liveness handlers.

use crate::server::AppState;
use serde_json::Value;

pub async fn get_journey(state: &AppState, _params: &Value) -> ovum_client::Result<Value> {
    let journey = state.client.journey().await?;
    Ok(serde_json::to_value(journey)?)
}

pub async fn get_dashboard_overview(
    state: &AppState,
    _params: &Value,
) -> ovum_client::Result<Value> {
    let overview = state.client.dashboard_overview().await?;
    Ok(serde_json::to_value(overview)?)
}

pub async fn backend_health(state: &AppState, _params: &Value) -> ovum_client::Result<Value> {
    state.client.backend_health().await
}
