//! Client configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `config/listings.{toml,yaml,json}` file, `LISTINGS__SECTION__KEY`
//! environment variables, and `API_URL` for the backend base URL. A `.env`
//! file is loaded first when present.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub prefix: String,
    /// Whole-request timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Base URL joined with the API prefix, without a trailing slash.
    pub fn root_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            prefix: "/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Which backend adapter to talk to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Rails JSON API with JWT bearer tokens.
    #[default]
    Rails,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StorageConfig {
    /// Where the session token is kept. In memory when unset.
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn credential_store(&self) -> Arc<dyn CredentialStore> {
        match &self.credentials_path {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => Arc::new(MemoryCredentialStore::new()),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from `.env`, files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        defaults()?
            .add_source(File::with_name("config/listings").required(false))
            .add_source(
                Environment::with_prefix("LISTINGS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_URL").ok())?
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a single file; the environment is ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let api = ApiConfig::default();
    Config::builder()
        .set_default("api.base_url", api.base_url)?
        .set_default("api.prefix", api.prefix)?
        .set_default("api.timeout_secs", api.timeout_secs as i64)?
        .set_default("backend.kind", "rails")
}
