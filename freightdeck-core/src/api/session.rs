//! Session context — explicit token lifecycle.
//!
//! One injected store replaces ambient credential reads: load from disk on
//! startup, mutate on login/refresh, clear on logout or failed refresh.
//! Tokens persist as JSON so a restart does not force a fresh login.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::api::ApiError;
use crate::schema::TokenPair;

/// In-memory tokens plus their on-disk home.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    tokens: Mutex<Option<TokenPair>>,
}

impl SessionStore {
    /// Load the session from disk. A missing or corrupt file simply means
    /// not logged in.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tokens = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok());
        Self {
            path,
            tokens: Mutex::new(tokens),
        }
    }

    /// An empty store that never touches disk at the given path until a
    /// login happens.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tokens: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.lock().expect("session lock poisoned").is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .expect("session lock poisoned")
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    /// Replace the tokens (login or refresh) and persist them.
    pub fn set(&self, pair: TokenPair) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::Storage(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(&pair).map_err(|e| ApiError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| ApiError::Storage(e.to_string()))?;
        *self.tokens.lock().expect("session lock poisoned") = Some(pair);
        Ok(())
    }

    /// Drop the tokens (logout or failed refresh). Removing the file is
    /// best effort.
    pub fn clear(&self) {
        *self.tokens.lock().expect("session lock poisoned") = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "acc".into(),
            refresh_token: "ref".into(),
        }
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempdir().unwrap();
        let store = SessionStore::load(dir.path().join("session.json"));
        assert!(!store.is_logged_in());
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn set_persists_and_reload_restores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load(&path);
        store.set(pair()).unwrap();
        assert_eq!(store.access_token().as_deref(), Some("acc"));

        let reloaded = SessionStore::load(&path);
        assert!(reloaded.is_logged_in());
        assert_eq!(reloaded.refresh_token().as_deref(), Some("ref"));
    }

    #[test]
    fn clear_removes_tokens_and_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::load(&path);
        store.set(pair()).unwrap();
        store.clear();
        assert!(!store.is_logged_in());
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_means_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = SessionStore::load(&path);
        assert!(!store.is_logged_in());
    }
}
