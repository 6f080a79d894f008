//! Authentication and session methods on OvumClient.

use tracing::info;

use crate::error::Result;
use crate::records::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterPatientRequest, StatusResponse,
};
use crate::session::{RouteAccess, RouteRequirement, Session, Surface};
use crate::OvumClient;

impl OvumClient {
    // ========================================
    // Authentication
    // ========================================

    /// Register a patient account.
    ///
    /// The backend logs the new account in immediately; the returned token
    /// is stored as the portal session.
    pub async fn register_patient(
        &self,
        request: &RegisterPatientRequest,
    ) -> Result<LoginResponse> {
        require_credentials(&request.email, &request.password)?;
        let response: LoginResponse = self
            .transport
            .post_json(Surface::Client, "/auth/register", request)
            .await?;
        self.session()
            .set_token(Surface::Client, &response.access_token)
            .await?;
        info!("Registered patient {}", response.user_id);
        Ok(response)
    }

    /// Log a patient into the portal and store the session token.
    pub async fn login_patient(&self, email: &str, password: &str) -> Result<LoginResponse> {
        require_credentials(email, password)?;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .transport
            .post_json(Surface::Client, "/auth/login", &request)
            .await?;
        self.session()
            .set_token(Surface::Client, &response.access_token)
            .await?;
        info!("Patient login for {}", response.user_id);
        Ok(response)
    }

    /// Log an admin or staff member into the console and store the
    /// session token. The backend rejects patient credentials here.
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<LoginResponse> {
        require_credentials(email, password)?;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .transport
            .post_json(Surface::Admin, "/auth/admin/login", &request)
            .await?;
        self.session()
            .set_token(Surface::Admin, &response.access_token)
            .await?;
        info!("Console login for {} ({})", response.user_id, response.role);
        Ok(response)
    }

    /// Change the password of the account logged into `surface`.
    ///
    /// Runs the same checks the change-password forms do before anything
    /// is sent; `confirm_password` never leaves the client.
    pub async fn change_password(
        &self,
        surface: Surface,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<StatusResponse> {
        validate_password_change(old_password, new_password, confirm_password)?;
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.transport
            .post_json(surface, "/auth/change-password", &request)
            .await
    }

    /// Request a password reset email. Does not need a session.
    pub async fn forgot_password(&self, email: &str) -> Result<StatusResponse> {
        let request = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.transport
            .post_json(Surface::Client, "/auth/forgot-password", &request)
            .await
    }

    /// Drop the stored token for a surface.
    pub async fn logout(&self, surface: Surface) -> Result<()> {
        self.session().clear(surface).await?;
        info!("Logged out of {} surface", surface.as_str());
        Ok(())
    }

    // ========================================
    // Session inspection
    // ========================================

    /// Snapshot of the session on a surface, with claims decoded from the
    /// stored token.
    pub async fn current_session(&self, surface: Surface) -> Session {
        self.session().session(surface).await
    }

    /// Decide whether the current session may enter a guarded route.
    pub async fn check_route(
        &self,
        requirement: &RouteRequirement,
        surface: Surface,
        requested_path: &str,
    ) -> RouteAccess {
        self.session()
            .check_route(requirement, surface, requested_path)
            .await
    }
}

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() {
        return Err(validation("email", "Email is required"));
    }
    if password.is_empty() {
        return Err(validation("password", "Password is required"));
    }
    Ok(())
}

/// The change-password form rules, in the order the forms report them.
fn validate_password_change(old: &str, new: &str, confirm: &str) -> Result<()> {
    if old.is_empty() {
        return Err(validation("oldPassword", "Current password is required"));
    }
    if new.is_empty() {
        return Err(validation("newPassword", "New password is required"));
    }
    if new.len() < 6 {
        return Err(validation(
            "newPassword",
            "Password must be at least 6 characters",
        ));
    }
    if confirm.is_empty() {
        return Err(validation(
            "confirmPassword",
            "Please confirm your new password",
        ));
    }
    if new != confirm {
        return Err(validation("confirmPassword", "Passwords do not match"));
    }
    if old == new {
        return Err(validation(
            "newPassword",
            "New password must be different from current password",
        ));
    }
    Ok(())
}

fn validation(field: &str, message: &str) -> crate::error::OvumError {
    crate::error::OvumError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_rules() {
        assert!(validate_password_change("old-secret", "new-secret", "new-secret").is_ok());

        let err = validate_password_change("", "new-secret", "new-secret").unwrap_err();
        assert!(err.to_string().contains("Current password is required"));

        let err = validate_password_change("old-secret", "short", "short").unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));

        let err = validate_password_change("old-secret", "new-secret", "other").unwrap_err();
        assert!(err.to_string().contains("do not match"));

        let err = validate_password_change("same-pass", "same-pass", "same-pass").unwrap_err();
        assert!(err.to_string().contains("must be different"));

        let err = validate_password_change("old-secret", "new-secret", "").unwrap_err();
        assert!(err.to_string().contains("confirm your new password"));
    }

    #[test]
    fn test_credentials_must_be_present() {
        assert!(require_credentials("a@clinic.test", "secret").is_ok());
        assert!(require_credentials("", "secret").is_err());
        assert!(require_credentials("a@clinic.test", "").is_err());
    }
}
