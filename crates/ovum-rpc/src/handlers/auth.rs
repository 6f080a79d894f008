//! Authentication, session, and route-guard handlers.

use crate::handlers::{get_str_param, parse_payload, parse_surface, require_str_param};
use crate::server::AppState;
use ovum_client::records::RegisterPatientRequest;
use ovum_client::{OvumError, RouteAccess, RouteRequirement, Surface};
use serde_json::{json, Value};

pub async fn register_patient(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let request: RegisterPatientRequest = parse_payload(params, "patient")?;
    let response = state.client.register_patient(&request).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn login_patient(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let email = require_str_param(params, "email", "email")?;
    let password = require_str_param(params, "password", "password")?;
    let response = state.client.login_patient(&email, &password).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn login_admin(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let email = require_str_param(params, "email", "email")?;
    let password = require_str_param(params, "password", "password")?;
    let response = state.client.login_admin(&email, &password).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn change_password(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Client)?;
    let old_password = require_str_param(params, "old_password", "oldPassword")?;
    let new_password = require_str_param(params, "new_password", "newPassword")?;
    let confirm_password = require_str_param(params, "confirm_password", "confirmPassword")?;
    let response = state
        .client
        .change_password(surface, &old_password, &new_password, &confirm_password)
        .await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn forgot_password(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let email = require_str_param(params, "email", "email")?;
    let response = state.client.forgot_password(&email).await?;
    Ok(serde_json::to_value(response)?)
}

pub async fn logout(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Client)?;
    state.client.logout(surface).await?;
    Ok(json!({"status": "ok"}))
}

pub async fn get_session(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let surface = parse_surface(params, Surface::Client)?;
    let session = state.client.current_session(surface).await;
    Ok(serde_json::to_value(session)?)
}

/// Evaluate a route guard the way the portals do before rendering a
/// protected view. `requirement` is `admin` or `patient`; patient routes
/// may carry a `subrole` restriction. The surface defaults to the one the
/// requirement implies.
pub async fn check_route(state: &AppState, params: &Value) -> ovum_client::Result<Value> {
    let path = require_str_param(params, "path", "path")?;
    let requirement = match require_str_param(params, "requirement", "requirement")?.as_str() {
        "admin" => RouteRequirement::AdminStaff,
        "patient" => RouteRequirement::Patient {
            subrole: get_str_param(params, "subrole", "subrole").map(String::from),
        },
        other => {
            return Err(OvumError::InvalidParams {
                message: format!("Unknown route requirement: {}", other),
            })
        }
    };
    let implied = match requirement {
        RouteRequirement::AdminStaff => Surface::Admin,
        RouteRequirement::Patient { .. } => Surface::Client,
    };
    let surface = parse_surface(params, implied)?;

    let access = state.client.check_route(&requirement, surface, &path).await;
    Ok(match access {
        RouteAccess::Granted => json!({"access": "granted"}),
        RouteAccess::RedirectToLogin { from } => {
            json!({"access": "redirectToLogin", "from": from})
        }
        RouteAccess::Denied => json!({"access": "denied"}),
    })
}
