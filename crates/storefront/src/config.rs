//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Backend
//! - `BACKEND_BASE_URL` - Base URL of the commerce backend
//! - `BACKEND_SYSTEM_KEY` - Shared system key sent with every backend request
//!
//! Both are optional at startup. While either is missing every proxied route
//! answers 500 with a fixed message instead of calling out.
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_ORDERS_FILE` - Local checkout order file (default: data/orders.json)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Commerce backend connection
    pub backend: BackendConfig,
    /// JSON file holding orders placed through the local checkout
    pub orders_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Commerce backend configuration.
///
/// Implements `Debug` manually to redact the system key.
#[derive(Clone, Default)]
pub struct BackendConfig {
    /// Base URL every upstream path is appended to
    pub base_url: Option<Url>,
    /// Shared credential sent as `x-system-key`
    pub system_key: Option<SecretString>,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field(
                "system_key",
                &self.system_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BackendConfig {
    /// Returns the base URL and system key, or the first missing variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` naming whichever setting is absent.
    pub fn require(&self) -> Result<(&Url, &SecretString), ConfigError> {
        let base_url = self
            .base_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKEND_BASE_URL".to_string()))?;
        let system_key = self
            .system_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKEND_SYSTEM_KEY".to_string()))?;
        Ok((base_url, system_key))
    }

    /// Returns true when both the base URL and system key are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.require().is_ok()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("STOREFRONT_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get("STOREFRONT_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let base_url = get("BACKEND_BASE_URL")
            .map(|raw| parse_base_url(&raw))
            .transpose()?;
        let system_key = get("BACKEND_SYSTEM_KEY")
            .map(|raw| validate_secret(raw, "BACKEND_SYSTEM_KEY"))
            .transpose()?;

        let orders_file = get("STOREFRONT_ORDERS_FILE")
            .map_or_else(|| PathBuf::from("data/orders.json"), PathBuf::from);

        Ok(Self {
            host,
            port,
            backend: BackendConfig {
                base_url,
                system_key,
            },
            orders_file,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse the backend base URL, forcing a trailing slash so relative joins
/// append to the path instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)
        .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_BASE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BACKEND_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Reject secrets that look like copied placeholders.
fn validate_secret(value: String, var_name: &str) -> Result<SecretString, ConfigError> {
    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }
    Ok(SecretString::from(value))
}
