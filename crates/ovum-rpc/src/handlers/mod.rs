//! JSON-RPC request handlers, split by domain.

mod appointments;
mod auth;
mod batches;
mod eggs;
mod evaluation;
mod frames;
mod overlay;
mod overview;
mod patients;
mod staff;

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use ovum_client::{OvumError, Surface};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

// ============================================================================
// JSON-RPC types
// ============================================================================

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: None,
            }),
            id,
        }
    }

    pub fn error_with_data(id: Option<Value>, code: i32, message: String, data: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data: Some(data),
            }),
            id,
        }
    }
}

// ============================================================================
// HTTP entry points
// ============================================================================

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// Main JSON-RPC handler.
pub async fn handle_rpc(
    State(state): State<Arc<AppState>>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    let method = &request.method;
    let params = request.params.unwrap_or(Value::Object(Default::default()));
    let id = request.id.clone();

    debug!("RPC call: {}({:?})", method, params);

    // Handle built-in methods
    if method == "health_check" {
        return (
            StatusCode::OK,
            Json(JsonRpcResponse::success(id, json!({"status": "ok"}))),
        );
    }

    // Dispatch to client methods
    let result = match dispatch_method(&state, method, &params).await {
        Some(result) => result,
        None => {
            warn!("Method not found: {}", method);
            return (
                StatusCode::OK,
                Json(JsonRpcResponse::error(
                    id,
                    -32601,
                    format!("Method not found: {}", method),
                )),
            );
        }
    };

    match result {
        Ok(value) => (StatusCode::OK, Json(JsonRpcResponse::success(id, value))),
        Err(e) => {
            error!("RPC error for {}: {}", method, e);
            let code = e.to_rpc_error_code();
            let response = match action_fallback(method) {
                // Action methods surface the backend's detail when it sent
                // one and the per-action generic message otherwise, the
                // same line the portals would show inline. The raw error
                // stays available under `data`.
                Some(fallback) => JsonRpcResponse::error_with_data(
                    id,
                    code,
                    e.surface_message(fallback),
                    json!({"error": e.to_string()}),
                ),
                None => JsonRpcResponse::error(id, code, e.to_string()),
            };
            (StatusCode::OK, Json(response))
        }
    }
}

// ============================================================================
// Method dispatcher
// ============================================================================

/// Dispatch a method call to the appropriate handler.
///
/// Returns `None` for unknown methods so the caller can answer with the
/// standard method-not-found error.
async fn dispatch_method(
    state: &AppState,
    method: &str,
    params: &Value,
) -> Option<ovum_client::Result<Value>> {
    let result = match method {
        // ====================================================================
        // Auth & session
        // ====================================================================
        "register_patient" => auth::register_patient(state, params).await,
        "login_patient" => auth::login_patient(state, params).await,
        "login_admin" => auth::login_admin(state, params).await,
        "change_password" => auth::change_password(state, params).await,
        "forgot_password" => auth::forgot_password(state, params).await,
        "logout" => auth::logout(state, params).await,
        "get_session" => auth::get_session(state, params).await,
        "check_route" => auth::check_route(state, params).await,

        // ====================================================================
        // Patients
        // ====================================================================
        "get_current_patient" => patients::get_current_patient(state, params).await,
        "list_patients" => patients::list_patients(state, params).await,
        "get_patient" => patients::get_patient(state, params).await,
        "update_patient" => patients::update_patient(state, params).await,
        "delete_patient" => patients::delete_patient(state, params).await,
        "get_evaluation_history" => patients::get_evaluation_history(state, params).await,

        // ====================================================================
        // Staff
        // ====================================================================
        "create_staff" => staff::create_staff(state, params).await,
        "list_staff" => staff::list_staff(state, params).await,
        "get_staff" => staff::get_staff(state, params).await,
        "update_staff" => staff::update_staff(state, params).await,
        "deactivate_staff" => staff::deactivate_staff(state, params).await,

        // ====================================================================
        // Appointments
        // ====================================================================
        "book_appointment" => appointments::book_appointment(state, params).await,
        "get_my_appointments" => appointments::get_my_appointments(state, params).await,
        "list_appointments" => appointments::list_appointments(state, params).await,
        "update_appointment" => appointments::update_appointment(state, params).await,

        // ====================================================================
        // Retrieval batches
        // ====================================================================
        "create_batch" => batches::create_batch(state, params).await,
        "get_batch" => batches::get_batch(state, params).await,
        "get_patient_batches" => batches::get_patient_batches(state, params).await,
        "update_batch" => batches::update_batch(state, params).await,
        "delete_batch" => batches::delete_batch(state, params).await,
        "approve_eligibility" => batches::approve_eligibility(state, params).await,
        "suggest_batch_eligibility" => batches::suggest_batch_eligibility(state, params).await,

        // ====================================================================
        // Frames & uploads
        // ====================================================================
        "get_batch_frames" => frames::get_batch_frames(state, params).await,
        "update_frame" => frames::update_frame(state, params).await,
        "delete_frame" => frames::delete_frame(state, params).await,
        "get_frame_image" => frames::get_frame_image(state, params).await,
        "count_frame_maturity" => frames::count_frame_maturity(state, params).await,
        "upload_frames" => frames::upload_frames(state, params).await,
        "get_upload_progress" => frames::get_upload_progress(state, params).await,
        "cancel_upload" => frames::cancel_upload(state, params).await,
        "clear_upload" => frames::clear_upload(state, params).await,

        // ====================================================================
        // Evaluation
        // ====================================================================
        "start_evaluation" => evaluation::start_evaluation(state, params).await,
        "re_evaluate" => evaluation::re_evaluate(state, params).await,
        "get_evaluation_status" => evaluation::get_evaluation_status(state, params).await,
        "watch_evaluation" => evaluation::watch_evaluation(state, params).await,
        "get_watch_progress" => evaluation::get_watch_progress(state, params).await,
        "cancel_watch" => evaluation::cancel_watch(state, params).await,
        "clear_watch" => evaluation::clear_watch(state, params).await,

        // ====================================================================
        // Egg records
        // ====================================================================
        "create_egg_record" => eggs::create_egg_record(state, params).await,
        "get_egg_record" => eggs::get_egg_record(state, params).await,
        "get_patient_egg_records" => eggs::get_patient_egg_records(state, params).await,
        "get_batch_egg_records" => eggs::get_batch_egg_records(state, params).await,
        "update_egg_record" => eggs::update_egg_record(state, params).await,
        "delete_egg_record" => eggs::delete_egg_record(state, params).await,

        // ====================================================================
        // Overviews & overlay geometry
        // ====================================================================
        "get_journey" => overview::get_journey(state, params).await,
        "get_dashboard_overview" => overview::get_dashboard_overview(state, params).await,
        "backend_health" => overview::backend_health(state, params).await,
        "project_overlay" => overlay::project_overlay(state, params).await,

        _ => return None,
    };
    Some(result)
}

/// The inline fallback message for an action, when the portals define one.
///
/// Read methods keep the raw error; these are the user-facing strings the
/// frontends show when the backend response carried no `detail`.
fn action_fallback(method: &str) -> Option<&'static str> {
    match method {
        "login_patient" | "login_admin" => Some("Login failed"),
        "register_patient" => Some("Register failed"),
        "change_password" => Some("Failed to change password"),
        "forgot_password" => Some("Failed to send reset email. Please try again."),
        "book_appointment" => Some("Failed to save appointment"),
        "update_appointment" => Some("Failed to update appointment"),
        "create_batch" => Some("Failed to create batch"),
        "delete_batch" => Some("Failed to delete batch"),
        "approve_eligibility" => Some("Failed to update eligibility status"),
        "start_evaluation" | "re_evaluate" | "watch_evaluation" => {
            Some("Failed to start evaluation")
        }
        "update_patient" => Some("Failed to update patient"),
        "delete_patient" => Some("Failed to delete patient"),
        "create_staff" => Some("Failed to create staff"),
        "update_staff" => Some("Failed to update staff"),
        "deactivate_staff" => Some("Failed to delete staff"),
        _ => None,
    }
}

// ============================================================================
// Parameter extraction helpers
// ============================================================================

/// Extract an optional string parameter, supporting both snake_case and
/// camelCase spellings.
pub(crate) fn get_str_param<'a>(params: &'a Value, snake: &str, camel: &str) -> Option<&'a str> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_str())
}

/// Extract a required string parameter or return an error.
pub(crate) fn require_str_param(
    params: &Value,
    snake: &str,
    camel: &str,
) -> ovum_client::Result<String> {
    get_str_param(params, snake, camel)
        .map(String::from)
        .ok_or_else(|| OvumError::InvalidParams {
            message: format!("Missing required parameter: {}", snake),
        })
}

/// Extract an optional bool parameter, supporting both snake_case and
/// camelCase spellings.
pub(crate) fn get_bool_param(params: &Value, snake: &str, camel: &str) -> Option<bool> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_bool())
}

/// Extract an optional u32 parameter, supporting both snake_case and
/// camelCase spellings.
pub(crate) fn get_u32_param(params: &Value, snake: &str, camel: &str) -> Option<u32> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
}

/// Extract an optional f64 parameter, supporting both snake_case and
/// camelCase spellings.
pub(crate) fn get_f64_param(params: &Value, snake: &str, camel: &str) -> Option<f64> {
    params
        .get(snake)
        .or_else(|| params.get(camel))
        .and_then(|v| v.as_f64())
}

/// Resolve the surface a call acts on. Methods with an inherent surface
/// pass it as the default; an explicit but unknown value is an error.
pub(crate) fn parse_surface(params: &Value, default: Surface) -> ovum_client::Result<Surface> {
    match params.get("surface").and_then(|v| v.as_str()) {
        None => Ok(default),
        Some(raw) => Surface::parse(raw).ok_or_else(|| OvumError::InvalidParams {
            message: format!("Unknown surface: {}", raw),
        }),
    }
}

/// Deserialize a required structured parameter.
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    params: &Value,
    key: &str,
) -> ovum_client::Result<T> {
    let value = params
        .get(key)
        .cloned()
        .ok_or_else(|| OvumError::InvalidParams {
            message: format!("Missing required parameter: {}", key),
        })?;
    serde_json::from_value(value).map_err(|e| OvumError::InvalidParams {
        message: format!("Invalid {} payload: {}", key, e),
    })
}
