//! Display-only JWT payload decoding.
//!
//! The payload segment is decoded without signature verification, solely
//! to read `role`/`subrole` claims for menu and route gating. This is a
//! trust-the-issuer convenience; authorization is enforced server-side.

use base64::Engine;
use serde::Deserialize;

/// Claims the backend puts in its tokens.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// For patients: `donor` or `recipient`.
    #[serde(default)]
    pub subrole: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decode the payload of `token` without verifying the signature.
///
/// Returns `None` for anything that is not three dot-separated base64url
/// segments with a JSON object payload. Never panics on malformed input.
pub fn decode_claims(token: &str) -> Option<JwtClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    // Tokens in the wild come both padded and unpadded.
    let payload = segments[1].trim_end_matches('=');
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
