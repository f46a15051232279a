//! Storage for the admin session token and email.
//!
//! # Design
//! The stored state is two optional strings. `CredentialStore` is the seam
//! between the client and wherever those live: `MemoryCredentialStore` keeps
//! them in a mutex, `FileCredentialStore` in a small JSON file that survives
//! restarts. Each call is atomic on its own and the last writer wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The persisted session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Credentials, ApiError>;

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError>;

    fn token(&self) -> Option<String> {
        self.load().ok().and_then(|c| c.token)
    }

    fn email(&self) -> Option<String> {
        self.load().ok().and_then(|c| c.email)
    }

    fn set_token(&self, token: &str) -> Result<(), ApiError> {
        let mut credentials = self.load()?;
        credentials.token = Some(token.to_string());
        self.save(&credentials)
    }

    fn set_email(&self, email: &str) -> Result<(), ApiError> {
        let mut credentials = self.load()?;
        credentials.email = Some(email.to_string());
        self.save(&credentials)
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.save(&Credentials::default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            inner: Mutex::new(Credentials {
                token: Some(token.to_string()),
                email: None,
            }),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials, ApiError> {
        self.inner
            .lock()
            .map(|c| c.clone())
            .map_err(|_| ApiError::Storage("credential lock poisoned".to_string()))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ApiError::Storage("credential lock poisoned".to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }
}

/// JSON file store. A missing file reads as empty credentials; clearing
/// removes the file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Credentials::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ApiError::Storage(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Credentials::default()),
            Err(e) => Err(ApiError::Storage(format!("{}: {e}", self.path.display()))),
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ApiError::Storage(format!("{}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(credentials)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| ApiError::Storage(format!("{}: {e}", self.path.display())))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!("{}: {e}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.token().is_none());

        store.set_token("abc").unwrap();
        store.set_email("admin@example.com").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.email().as_deref(), Some("admin@example.com"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Credentials::default());
    }

    #[test]
    fn set_token_keeps_email() {
        let store = MemoryCredentialStore::new();
        store.set_email("admin@example.com").unwrap();
        store.set_token("rotated").unwrap();
        assert_eq!(store.email().as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileCredentialStore::new(&path).set_token("xyz").unwrap();
        FileCredentialStore::new(&path).set_email("a@b.c").unwrap();

        let reopened = FileCredentialStore::new(&path);
        assert_eq!(reopened.token().as_deref(), Some("xyz"));
        assert_eq!(reopened.email().as_deref(), Some("a@b.c"));

        reopened.clear().unwrap();
        assert!(!path.exists());
        assert!(reopened.token().is_none());
        reopened.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileCredentialStore::new(&path);
        assert!(matches!(store.load(), Err(ApiError::Storage(_))));
        assert!(store.token().is_none());
    }
}
