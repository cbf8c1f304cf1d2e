//! Integration test harness for the Bazaar storefront.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - a [`StubBackend`] standing in for the commerce backend, which answers
//!   from canned responses and records every request it receives
//! - the real storefront router, configured to point at the stub
//!
//! and drives the storefront over HTTP with `reqwest`.
//!
//! ```rust,ignore
//! let backend = StubBackend::builder()
//!     .respond(Method::GET, "/v1/categories", StatusCode::OK, json!([]))
//!     .spawn()
//!     .await;
//! let storefront = TestStorefront::spawn(Some(&backend)).await;
//! let resp = storefront.client.get(storefront.url("/api/categories")).send().await?;
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::state::AppState;
use serde_json::Value;
use tempfile::TempDir;
use url::Url;

/// System key the harness configures on the storefront.
pub const SYSTEM_KEY: &str = "itest-sys-4f9c2a";

/// Path prefix of the stub backend's base URL.
pub const BACKEND_PREFIX: &str = "/v1";

// =============================================================================
// Stub backend
// =============================================================================

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// A header value as a string, if present and visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
enum Canned {
    Json(StatusCode, Value),
    Text(StatusCode, String),
}

#[derive(Debug, Default)]
struct StubInner {
    responses: HashMap<(Method, String), Canned>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

/// Builder for [`StubBackend`].
#[derive(Debug, Default)]
pub struct StubBackendBuilder {
    responses: HashMap<(Method, String), Canned>,
}

impl StubBackendBuilder {
    /// Answer `method path` with a JSON body.
    #[must_use]
    pub fn respond(mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Self {
        self.responses
            .insert((method, path.to_string()), Canned::Json(status, body));
        self
    }

    /// Answer `method path` with a plain-text body.
    #[must_use]
    pub fn respond_text(mut self, method: Method, path: &str, status: StatusCode, body: &str) -> Self {
        self.responses
            .insert((method, path.to_string()), Canned::Text(status, body.to_string()));
        self
    }

    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(self) -> StubBackend {
        let inner = Arc::new(StubInner {
            responses: self.responses,
            recorded: Mutex::default(),
        });
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&inner));
        let addr = serve(app).await;
        let base_url = Url::parse(&format!("http://{addr}{BACKEND_PREFIX}"))
            .expect("stub backend URL is valid");
        StubBackend { base_url, inner }
    }
}

/// A fake commerce backend.
#[derive(Debug, Clone)]
pub struct StubBackend {
    pub base_url: Url,
    inner: Arc<StubInner>,
}

impl StubBackend {
    #[must_use]
    pub fn builder() -> StubBackendBuilder {
        StubBackendBuilder::default()
    }

    /// Every request received so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if a handler panicked while holding the record lock.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.recorded.lock().expect("record lock").clone()
    }

    /// The single request received so far.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one request was received.
    #[must_use]
    pub fn only_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected one backend request: {requests:?}");
        requests.remove(0)
    }
}

async fn handle(
    State(stub): State<Arc<StubInner>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers,
        body: serde_json::from_slice(&body).ok(),
    };
    stub.recorded.lock().expect("record lock").push(recorded);

    match stub.responses.get(&(method, path)) {
        Some(Canned::Json(status, body)) => (*status, axum::Json(body.clone())).into_response(),
        Some(Canned::Text(status, body)) => (
            *status,
            [(header::CONTENT_TYPE, "text/plain")],
            body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({ "error": "no stub for this route" })),
        )
            .into_response(),
    }
}

// =============================================================================
// Storefront under test
// =============================================================================

/// The real storefront router served on an ephemeral port.
#[derive(Debug)]
pub struct TestStorefront {
    pub base_url: Url,
    pub client: reqwest::Client,
    /// Holds the local order file; removed on drop.
    pub data_dir: TempDir,
}

impl TestStorefront {
    /// Start a storefront pointed at `backend`, or with no backend
    /// configured at all when `None`.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected or the listener cannot bind.
    pub async fn spawn(backend: Option<&StubBackend>) -> Self {
        let data_dir = tempfile::tempdir().expect("create temp dir");
        let orders_file = data_dir.path().join("orders.json");

        let mut vars: HashMap<&str, String> = HashMap::new();
        vars.insert("STOREFRONT_ORDERS_FILE", orders_file.display().to_string());
        if let Some(backend) = backend {
            vars.insert("BACKEND_BASE_URL", backend.base_url.to_string());
            vars.insert("BACKEND_SYSTEM_KEY", SYSTEM_KEY.to_string());
        }

        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");
        let state = AppState::new(config).expect("storefront state builds");
        let addr = serve(bazaar_storefront::app(state)).await;

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).expect("storefront URL is valid"),
            client: reqwest::Client::new(),
            data_dir,
        }
    }

    /// Absolute URL for a storefront path.
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be joined onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path.trim_start_matches('/'))
            .expect("valid storefront path")
    }

    /// Path of the local order file.
    #[must_use]
    pub fn orders_file(&self) -> std::path::PathBuf {
        self.data_dir.path().join("orders.json")
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}
