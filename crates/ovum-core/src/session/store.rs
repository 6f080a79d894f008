//! On-disk persistence for login tokens.
//!
//! Tokens live in a single JSON file under the platform config directory,
//! one slot per surface, mirroring the browser local-storage keys the
//! portal frontends use.

use super::Surface;
use crate::config::PathsConfig;
use crate::error::{OvumError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Serialized token slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

impl TokenFile {
    pub fn get(&self, surface: Surface) -> Option<&str> {
        match surface {
            Surface::Admin => self.admin_token.as_deref(),
            Surface::Client => self.client_token.as_deref(),
        }
    }

    pub fn set(&mut self, surface: Surface, token: Option<String>) {
        match surface {
            Surface::Admin => self.admin_token = token,
            Surface::Client => self.client_token = token,
        }
    }
}

/// Reads and writes the token file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store rooted at `config_dir`, or the platform default
    /// (`~/.config/ovum` on Linux) when `None`.
    pub fn new(config_dir: Option<&Path>) -> Result<Self> {
        let dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_config_dir()?,
        };
        Ok(Self {
            path: dir.join(PathsConfig::TOKEN_FILENAME),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load saved tokens. A missing file is an empty set, not an error.
    pub fn load(&self) -> Result<TokenFile> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(TokenFile::default()),
            Err(error) => Err(OvumError::io_with_path(error, &self.path)),
        }
    }

    /// Write tokens to disk with restrictive permissions (0600 on Unix).
    pub fn save(&self, tokens: &TokenFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| OvumError::io_with_path(e, parent))?;
        }
        let contents = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.path, contents).map_err(|e| OvumError::io_with_path(e, &self.path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| OvumError::io_with_path(e, &self.path))?;
        }

        Ok(())
    }

    /// Update one slot on disk, leaving the other untouched.
    pub fn persist(&self, surface: Surface, token: Option<&str>) -> Result<()> {
        let mut tokens = self.load()?;
        tokens.set(surface, token.map(|t| t.to_string()));
        self.save(&tokens)
    }
}

/// Platform config directory for the application.
pub fn default_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(PathsConfig::CONFIG_DIR_NAME))
        .ok_or_else(|| OvumError::Config {
            message: "Could not determine the platform config directory".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, TokenStore) {
        let temp = TempDir::new().unwrap();
        let store = TokenStore::new(Some(temp.path())).unwrap();
        (temp, store)
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let (_temp, store) = setup();
        let tokens = store.load().unwrap();
        assert!(tokens.admin_token.is_none());
        assert!(tokens.client_token.is_none());
    }

    #[test]
    fn test_persist_round_trip_keeps_other_slot() {
        let (_temp, store) = setup();
        store.persist(Surface::Admin, Some("admin-jwt")).unwrap();
        store.persist(Surface::Client, Some("client-jwt")).unwrap();

        let tokens = store.load().unwrap();
        assert_eq!(tokens.get(Surface::Admin), Some("admin-jwt"));
        assert_eq!(tokens.get(Surface::Client), Some("client-jwt"));

        store.persist(Surface::Admin, None).unwrap();
        let tokens = store.load().unwrap();
        assert!(tokens.get(Surface::Admin).is_none());
        assert_eq!(tokens.get(Surface::Client), Some("client-jwt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_sets_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, store) = setup();
        store.persist(Surface::Client, Some("secret")).unwrap();

        let metadata = std::fs::metadata(store.path()).unwrap();
        let mode = metadata.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "Token file should have 0600 permissions");
    }

    #[test]
    fn test_token_file_omits_empty_slots() {
        let tokens = TokenFile {
            admin_token: Some("a".to_string()),
            client_token: None,
        };
        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(json["admin_token"], "a");
        assert!(json.get("client_token").is_none());
    }
}
