//! Route guard decisions for protected views.

use super::jwt::decode_claims;

/// Which identities a protected route admits.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteRequirement {
    /// Admin console routes: `admin` or `staff` role.
    AdminStaff,
    /// Patient portal routes, optionally restricted to one subrole.
    Patient { subrole: Option<String> },
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteAccess {
    Granted,
    /// No token; the caller should show the login screen and keep `from`
    /// for a post-login redirect.
    RedirectToLogin { from: String },
    /// A token exists but its role does not admit this route.
    Denied,
}

/// Decide access to a protected route.
///
/// Presence is checked before claims: an absent or empty token always
/// redirects, preserving the requested path. A token that fails to
/// decode, or decodes to the wrong role, denies instead.
pub fn check_route(
    requirement: &RouteRequirement,
    token: Option<&str>,
    requested_path: &str,
) -> RouteAccess {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => {
            return RouteAccess::RedirectToLogin {
                from: requested_path.to_string(),
            }
        }
    };

    let claims = match decode_claims(token) {
        Some(claims) => claims,
        None => return RouteAccess::Denied,
    };
    let role = claims.role.as_deref().unwrap_or("");

    match requirement {
        RouteRequirement::AdminStaff => {
            if role == "admin" || role == "staff" {
                RouteAccess::Granted
            } else {
                RouteAccess::Denied
            }
        }
        RouteRequirement::Patient { subrole } => {
            if role != "patient" {
                return RouteAccess::Denied;
            }
            match subrole {
                Some(required) if claims.subrole.as_deref() != Some(required.as_str()) => {
                    RouteAccess::Denied
                }
                _ => RouteAccess::Granted,
            }
        }
    }
}
