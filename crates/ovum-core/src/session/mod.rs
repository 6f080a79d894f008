//! Session state for the two portal surfaces.
//!
//! The admin console and the patient portal authenticate independently,
//! each with its own token slot (`admin_token` / `client_token`). The
//! session manager owns both slots: populated at login, cleared at logout
//! or on a 401, optionally mirrored to disk so a restarted process stays
//! signed in.

pub mod guard;
pub mod jwt;
pub mod store;

pub use guard::{check_route, RouteAccess, RouteRequirement};
pub use jwt::{decode_claims, JwtClaims};
pub use store::{default_config_dir, TokenFile, TokenStore};

use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Which portal a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Admin console (staff and admins).
    Admin,
    /// Patient portal.
    Client,
}

impl Surface {
    /// The storage key the corresponding browser app uses.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Surface::Admin => "admin_token",
            Surface::Client => "client_token",
        }
    }

    /// Parse the wire name (`admin` / `client`).
    pub fn parse(value: &str) -> Option<Surface> {
        match value {
            "admin" => Some(Surface::Admin),
            "client" => Some(Surface::Client),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Admin => "admin",
            Surface::Client => "client",
        }
    }
}

/// Snapshot of one surface's session, with the token's display claims
/// already decoded. Carries no secret material.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub surface: &'static str,
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub role: Option<String>,
    pub subrole: Option<String>,
}

/// Owns the token slots for both surfaces.
#[derive(Clone)]
pub struct SessionManager {
    tokens: Arc<RwLock<TokenFile>>,
    store: Option<TokenStore>,
}

impl SessionManager {
    /// Create a manager, loading any persisted tokens when `persist` is
    /// set. `config_dir` overrides the platform config directory.
    pub fn new(config_dir: Option<&Path>, persist: bool) -> Result<Self> {
        let (store, tokens) = if persist {
            let store = TokenStore::new(config_dir)?;
            let tokens = store.load()?;
            (Some(store), tokens)
        } else {
            (None, TokenFile::default())
        };

        Ok(Self {
            tokens: Arc::new(RwLock::new(tokens)),
            store,
        })
    }

    /// In-memory manager with no disk mirror.
    pub fn ephemeral() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(TokenFile::default())),
            store: None,
        }
    }

    /// Current token for a surface.
    pub async fn token(&self, surface: Surface) -> Option<String> {
        self.tokens.read().await.get(surface).map(|t| t.to_string())
    }

    /// Store a token after a successful login.
    pub async fn set_token(&self, surface: Surface, token: &str) -> Result<()> {
        self.update(surface, Some(token.to_string())).await
    }

    /// Drop a surface's token (logout).
    pub async fn clear(&self, surface: Surface) -> Result<()> {
        self.update(surface, None).await
    }

    /// Discard the token after the backend rejected it with a 401. The
    /// next guard check will redirect to login.
    pub async fn handle_unauthorized(&self, surface: Surface) {
        if let Err(error) = self.update(surface, None).await {
            tracing::warn!("Failed to clear rejected {} token: {}", surface.as_str(), error);
        }
    }

    /// Decoded display claims for a surface, if a token is present.
    pub async fn claims(&self, surface: Surface) -> Option<JwtClaims> {
        let token = self.token(surface).await?;
        decode_claims(&token)
    }

    /// Snapshot for UI gating.
    pub async fn session(&self, surface: Surface) -> Session {
        let token = self.token(surface).await;
        let claims = token.as_deref().and_then(decode_claims);
        Session {
            surface: surface.as_str(),
            authenticated: token.is_some(),
            user_id: claims.as_ref().and_then(|c| c.user_id.clone()),
            role: claims.as_ref().and_then(|c| c.role.clone()),
            subrole: claims.as_ref().and_then(|c| c.subrole.clone()),
        }
    }

    /// Guard check against a surface's current token.
    pub async fn check_route(
        &self,
        requirement: &RouteRequirement,
        surface: Surface,
        requested_path: &str,
    ) -> RouteAccess {
        let token = self.token(surface).await;
        check_route(requirement, token.as_deref(), requested_path)
    }

    async fn update(&self, surface: Surface, token: Option<String>) -> Result<()> {
        {
            let mut tokens = self.tokens.write().await;
            tokens.set(surface, token.clone());
        }
        if let Some(store) = &self.store {
            store.persist(surface, token.as_deref())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token values are redacted.
        let slots = match self.tokens.try_read() {
            Ok(tokens) => (
                tokens.admin_token.is_some(),
                tokens.client_token.is_some(),
            ),
            Err(_) => (false, false),
        };
        f.debug_struct("SessionManager")
            .field("admin_token", &if slots.0 { "***" } else { "<none>" })
            .field("client_token", &if slots.1 { "***" } else { "<none>" })
            .field("persisted", &self.store.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use tempfile::TempDir;

    fn token_for(payload: &str) -> String {
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!("h.{}.s", engine.encode(payload))
    }

    fn setup() -> (TempDir, SessionManager) {
        let temp = TempDir::new().unwrap();
        let manager = SessionManager::new(Some(temp.path()), true).unwrap();
        (temp, manager)
    }

    #[tokio::test]
    async fn test_surfaces_are_independent() {
        let manager = SessionManager::ephemeral();
        manager.set_token(Surface::Admin, "admin-jwt").await.unwrap();

        assert!(manager.token(Surface::Admin).await.is_some());
        assert!(manager.token(Surface::Client).await.is_none());

        manager.clear(Surface::Admin).await.unwrap();
        assert!(manager.token(Surface::Admin).await.is_none());
    }

    #[tokio::test]
    async fn test_tokens_survive_manager_restart() {
        let (temp, manager) = setup();
        manager.set_token(Surface::Client, "client-jwt").await.unwrap();
        drop(manager);

        let reloaded = SessionManager::new(Some(temp.path()), true).unwrap();
        assert_eq!(
            reloaded.token(Surface::Client).await.as_deref(),
            Some("client-jwt")
        );
    }

    #[tokio::test]
    async fn test_unauthorized_discards_token() {
        let (_temp, manager) = setup();
        manager.set_token(Surface::Admin, "stale").await.unwrap();
        manager.handle_unauthorized(Surface::Admin).await;
        assert!(manager.token(Surface::Admin).await.is_none());
    }

    #[tokio::test]
    async fn test_session_snapshot_decodes_claims() {
        let manager = SessionManager::ephemeral();
        let token = token_for(r#"{"userId":"u1","role":"patient","subrole":"recipient"}"#);
        manager.set_token(Surface::Client, &token).await.unwrap();

        let session = manager.session(Surface::Client).await;
        assert!(session.authenticated);
        assert_eq!(session.role.as_deref(), Some("patient"));
        assert_eq!(session.subrole.as_deref(), Some("recipient"));

        let empty = manager.session(Surface::Admin).await;
        assert!(!empty.authenticated);
        assert!(empty.role.is_none());
    }

    #[test]
    fn test_storage_keys_match_browser_apps() {
        assert_eq!(Surface::Admin.storage_key(), "admin_token");
        assert_eq!(Surface::Client.storage_key(), "client_token");
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let manager = SessionManager::ephemeral();
        let output = format!("{:?}", manager);
        assert!(output.contains("<none>"));
        assert!(!output.contains("jwt"));
    }
}
