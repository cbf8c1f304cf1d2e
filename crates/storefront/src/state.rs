//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, BackendError};
use crate::config::{ConfigError, StorefrontConfig};
use crate::error::AppError;
use crate::orders::OrderFileStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The backend client only exists when both
/// the base URL and system key are configured; handlers reach it through
/// [`AppState::backend`], which turns its absence into a configuration
/// error before any network call is attempted.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    backend: Option<BackendClient>,
    orders: OrderFileStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, BackendError> {
        let backend = match config.backend.require() {
            Ok((base_url, system_key)) => {
                Some(BackendClient::new(base_url.clone(), system_key.clone())?)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Backend not configured; proxied routes will return 500");
                None
            }
        };
        let orders = OrderFileStore::new(config.orders_file.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                orders,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the backend client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the base URL or system key is missing.
    pub fn backend(&self) -> Result<&BackendClient, AppError> {
        self.inner.backend.as_ref().ok_or_else(|| {
            let missing = self.inner.config.backend.require().err().unwrap_or_else(|| {
                ConfigError::MissingEnvVar("BACKEND_BASE_URL".to_string())
            });
            AppError::Config(missing)
        })
    }

    /// Get the local order file.
    #[must_use]
    pub fn orders(&self) -> &OrderFileStore {
        &self.inner.orders
    }
}
