//! Workspace configuration
//!
//! Loaded from TOML; every section and key is optional and falls back to
//! the defaults below.
//!
//! ```toml
//! [api]
//! base_url = "http://127.0.0.1:3000"
//! taxonomy_url = "https://dog.ceo/api/breeds/list/all"
//! request_timeout_secs = 10
//!
//! [guard]
//! protected_prefix = "/admin"
//! login_path = "/login"
//! session_cookie = "session"
//! scheme = "https"
//! tokens = ["s3cret"]
//!
//! [logging]
//! filter = "info,pet_admin_core=debug"
//! json = false
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PET_ADMIN_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub api: ApiSettings,
    pub guard: GuardSettings,
    pub logging: LoggingSettings,
}

impl AdminConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML or wrong value types.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a file
    ///
    /// # Errors
    /// `ConfigError::Io` if unreadable, `ConfigError::Parse` if malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from `path` if given and present, otherwise use defaults
    ///
    /// # Errors
    /// Only when the file exists but cannot be read or parsed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// With API base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    /// With taxonomy URL
    #[inline]
    #[must_use]
    pub fn with_taxonomy_url(mut self, taxonomy_url: impl Into<String>) -> Self {
        self.api.taxonomy_url = taxonomy_url.into();
        self
    }

    /// With accepted session tokens
    #[inline]
    #[must_use]
    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.guard.tokens = tokens;
        self
    }
}

/// External API endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Origin of the record storage API (`/api/pet/{id}` is appended)
    pub base_url: String,
    /// Full URL of the breed list
    pub taxonomy_url: String,
    /// Per-request timeout; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl ApiSettings {
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            taxonomy_url: "https://dog.ceo/api/breeds/list/all".to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Route guard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    /// Paths starting with this prefix require a session
    pub protected_prefix: String,
    /// Redirect target for unauthenticated requests
    pub login_path: String,
    /// Cookie carrying the session credential
    pub session_cookie: String,
    /// Scheme used to rebuild the request origin when no proxy header says otherwise
    pub scheme: String,
    /// Session tokens accepted by the built-in cookie resolver
    pub tokens: Vec<String>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            protected_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
            session_cookie: "session".to_string(),
            scheme: "http".to_string(),
            tokens: Vec::new(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
