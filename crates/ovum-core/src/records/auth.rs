//! Authentication request and response records.

use serde::{Deserialize, Serialize};

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatientRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// `donor` or `recipient`.
    pub role: String,
    /// Date of birth, `YYYY-MM-DD` or full ISO datetime.
    pub dob: String,
    pub phone: String,
    pub address: String,
}

/// Payload for `POST /auth/login` and `POST /auth/admin/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response from login and register endpoints.
///
/// The token field is the one snake_case holdout in the API surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(rename = "access_token")]
    pub access_token: String,
    pub user_id: String,
    /// `patient`, `staff`, or `admin`.
    pub role: String,
}

/// Payload for `POST /auth/change-password`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Payload for `POST /auth/forgot-password`.
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Generic `{"status": "..."}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_uses_snake_case_token_field() {
        let json = r#"{"access_token": "abc", "userId": "u1", "role": "patient"}"#;
        let parsed: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "abc");
        assert_eq!(parsed.user_id, "u1");
        assert_eq!(parsed.role, "patient");
    }

    #[test]
    fn test_register_request_serializes_camel_case() {
        let req = RegisterPatientRequest {
            email: "p@example.com".to_string(),
            password: "secret".to_string(),
            full_name: "Pat Example".to_string(),
            role: "donor".to_string(),
            dob: "1990-01-01".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Clinic Way".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["fullName"], "Pat Example");
        assert!(value.get("full_name").is_none());
    }
}
