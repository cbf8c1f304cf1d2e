//! Commerce backend HTTP client.
//!
//! # Architecture
//!
//! - Every call is a single attempt. No retry, backoff, or caching.
//! - The shared system key is attached as `x-system-key` on every request.
//! - A per-user bearer token is forwarded unchanged when the route has one.
//! - Non-2xx responses become [`BackendError::Upstream`] carrying the status
//!   and JSON body so the route can forward them verbatim.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::backend::{BackendClient, UpstreamCall};
//!
//! let client = BackendClient::new(base_url, system_key)?;
//!
//! // GET {base}/products?category=lamps
//! let page: UpstreamList<ProductSummary> = client
//!     .fetch(UpstreamCall::get("products").query("category", "lamps"))
//!     .await?;
//! ```

pub mod types;

use std::sync::Arc;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::middleware::BearerToken;

/// Header carrying the shared system key.
pub const SYSTEM_KEY_HEADER: &str = "x-system-key";

/// Errors that can occur when calling the commerce backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}")]
    Upstream {
        status: StatusCode,
        /// Response body, when it was JSON.
        body: Option<Value>,
    },

    /// The backend body did not match the expected schema.
    #[error("failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The upstream URL could not be built.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// A forwarded header value was not representable.
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

// =============================================================================
// UpstreamCall
// =============================================================================

/// Description of one backend request.
#[derive(Debug, Clone)]
pub struct UpstreamCall {
    method: reqwest::Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    bearer: Option<String>,
    body: Option<Value>,
}

impl UpstreamCall {
    fn new(method: reqwest::Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }

    /// A GET to a fixed path under the base URL.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(reqwest::Method::GET, path)
    }

    /// A POST to a fixed path under the base URL.
    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(reqwest::Method::POST, path)
    }

    /// Append one dynamic path segment. The value is percent-encoded.
    #[must_use]
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Add a query parameter if a value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v.to_string()),
            None => self,
        }
    }

    /// Forward a user's bearer token.
    #[must_use]
    pub fn bearer(mut self, token: &BearerToken) -> Self {
        self.bearer = Some(token.as_str().to_string());
        self
    }

    /// Forward a bearer token if the caller sent one.
    #[must_use]
    pub fn bearer_opt(self, token: Option<&BearerToken>) -> Self {
        match token {
            Some(t) => self.bearer(t),
            None => self,
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The upstream path, for logging.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    fn url(&self, base: &Url) -> Result<Url, BackendError> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| BackendError::InvalidUrl(base.to_string()))?;
            path.pop_if_empty();
            for segment in &self.segments {
                path.push(segment);
            }
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

// =============================================================================
// Passthrough
// =============================================================================

/// A successful backend response relayed as-is.
#[derive(Debug, Clone)]
pub struct Passthrough {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl IntoResponse for Passthrough {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, axum::Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the commerce backend.
///
/// Cheap to clone; the underlying `reqwest::Client` and credentials are
/// shared.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
    system_key: SecretString,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("system_key", &"[REDACTED]")
            .finish()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, system_key: SecretString) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bazaar-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url,
                system_key,
            }),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Send a request and return the raw successful body.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Upstream` for non-2xx statuses and
    /// `BackendError::Http` when the request fails in transit.
    #[instrument(skip(self, call), fields(method = %call.method, path = %call.path()))]
    async fn execute(&self, call: UpstreamCall) -> Result<(StatusCode, String), BackendError> {
        let url = call.url(&self.inner.base_url)?;

        let system_key = HeaderValue::from_str(self.inner.system_key.expose_secret())
            .map_err(|_| BackendError::InvalidHeader(SYSTEM_KEY_HEADER))?;

        let mut request = self
            .inner
            .client
            .request(call.method, url)
            .header(SYSTEM_KEY_HEADER, system_key)
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-store");

        if let Some(token) = &call.bearer {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| BackendError::InvalidHeader("authorization"))?;
            request = request.header(header::AUTHORIZATION, value);
        }

        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "Backend request failed");
            BackendError::Http(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::Upstream {
                status,
                body: serde_json::from_str(&text).ok(),
            });
        }

        tracing::debug!(status = %status, "Backend request succeeded");
        Ok((status, text))
    }

    /// Send a request and relay the JSON body unchanged.
    ///
    /// An empty success body is relayed as a bare status.
    ///
    /// # Errors
    ///
    /// See [`BackendClient::fetch`].
    pub async fn passthrough(&self, call: UpstreamCall) -> Result<Passthrough, BackendError> {
        let (status, text) = self.execute(call).await?;
        if text.trim().is_empty() {
            return Ok(Passthrough { status, body: None });
        }
        let body = decode::<Value>(&text)?;
        Ok(Passthrough {
            status,
            body: Some(body),
        })
    }

    /// Send a request and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Upstream` for non-2xx statuses,
    /// `BackendError::Http` for transport failures, and
    /// `BackendError::Decode` when the body does not match `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, call: UpstreamCall) -> Result<T, BackendError> {
        let (_, text) = self.execute(call).await?;
        decode(&text)
    }

    /// Send a request where only success matters.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Upstream` for non-2xx statuses and
    /// `BackendError::Http` for transport failures.
    pub async fn send(&self, call: UpstreamCall) -> Result<(), BackendError> {
        self.execute(call).await.map(|_| ())
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, BackendError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to decode backend response"
        );
        BackendError::Decode(e)
    })
}
