#![forbid(unsafe_code)]

//! Session persistence and role checks.
//!
//! The store is injected, never a global: the app builds one at startup
//! and hands it to whatever needs it. State is a single JSON file under
//! the platform config dir, rewritten whole on every change.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dto::{AuthResponse, User};
use crate::error::Result;

/// The two roles the backend grants elevated access to.
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_ADMIN: &str = "admin";

const SESSION_FILE: &str = "session.json";

/// Persisted session payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Session store backed by one JSON file.
#[derive(Debug)]
pub struct AuthStore {
    path: PathBuf,
    state: AuthState,
}

impl AuthStore {
    /// Store at the platform-default location
    /// (`~/.config/atelier/session.json` on Linux).
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "atelier-ops", "atelier");
        let path = match dirs {
            Some(dirs) => dirs.config_dir().join(SESSION_FILE),
            None => PathBuf::from(SESSION_FILE),
        };
        Self::open(path)
    }

    /// Store at an explicit path. A missing or unreadable file starts a
    /// logged-out session rather than failing startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(err) => {
                    warn!(path = %path.display(), %err, "session file unreadable, starting logged out");
                    AuthState::default()
                }
            },
            Err(_) => AuthState::default(),
        };
        Ok(Self { path, state })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.token.is_some()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.state
            .user
            .as_ref()
            .is_some_and(|user| user.roles.iter().any(|r| r == role))
    }

    #[must_use]
    pub fn is_manager(&self) -> bool {
        self.has_role(ROLE_MANAGER)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Record a successful login and persist.
    pub fn set_auth(&mut self, auth: AuthResponse) -> Result<()> {
        self.state = AuthState {
            token: Some(auth.token),
            refresh_token: auth.refresh_token,
            user: Some(auth.user),
        };
        self.persist()
    }

    /// Clear the session and persist the empty state.
    pub fn logout(&mut self) -> Result<()> {
        debug!("logout");
        self.state = AuthState::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(roles: &[&str]) -> AuthResponse {
        AuthResponse {
            token: "tok-1".into(),
            refresh_token: Some("refresh-1".into()),
            user: User {
                id: 1,
                email: "ada@atelier.test".into(),
                name: "Ada".into(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        }
    }

    #[test]
    fn missing_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = AuthStore::open(dir.path().join("session.json")).unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn set_auth_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = AuthStore::open(&path).unwrap();
        store.set_auth(auth(&["manager"])).unwrap();
        assert!(store.is_authenticated());

        let reloaded = AuthStore::open(&path).unwrap();
        assert_eq!(reloaded.token(), Some("tok-1"));
        assert!(reloaded.is_manager());
        assert!(!reloaded.is_admin());
    }

    #[test]
    fn logout_clears_state_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = AuthStore::open(&path).unwrap();
        store.set_auth(auth(&["admin"])).unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());

        let reloaded = AuthStore::open(&path).unwrap();
        assert!(!reloaded.is_authenticated());
        assert!(reloaded.state().refresh_token.is_none());
    }

    #[test]
    fn corrupt_file_starts_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = AuthStore::open(&path).unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn role_checks_use_fixed_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AuthStore::open(dir.path().join("session.json")).unwrap();
        store.set_auth(auth(&["manager", "admin"])).unwrap();
        assert!(store.is_manager());
        assert!(store.is_admin());
        assert!(!store.has_role("intern"));
    }
}
