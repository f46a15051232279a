//! Explicit session handle passed to the API client.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::credentials::{CredentialStore, MemoryCredentialStore};
use crate::error::ApiError;

/// Cheap-to-clone view of the admin session held in a `CredentialStore`.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// A session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    pub fn admin_email(&self) -> Option<String> {
        self.store.email()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }

    /// Value for the `Authorization` request header.
    pub fn bearer(&self) -> Option<String> {
        self.token()
            .filter(|t| !t.is_empty())
            .map(|t| format!("Bearer {t}"))
    }

    /// Store a token handed back by the server.
    pub fn rotate(&self, token: &str) -> Result<(), ApiError> {
        debug!("storing rotated session token");
        self.store.set_token(token)
    }

    pub fn remember_email(&self, email: &str) -> Result<(), ApiError> {
        self.store.set_email(email)
    }

    /// Drop token and email. Failures are logged and otherwise ignored so a
    /// logout always looks effective to the caller.
    pub fn clear(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored credentials");
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
