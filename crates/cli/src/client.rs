//! HTTP client for the storefront API.

use bazaar_core::api::ApiEnvelope;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{CliError, Result};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the storefront at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(mut base: Url) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("bazaar-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    /// Resolve an API path and query against the storefront URL.
    pub(crate) fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.join(path.trim_start_matches('/'))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GET a path and decode the envelope.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Api` for error statuses and `CliError::Http` when
    /// the request fails or the body is not an envelope.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<ApiEnvelope<T>> {
        let mut request = self
            .http
            .get(self.url(path, query)?)
            .header(CACHE_CONTROL, "no-store");
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        read(request.send().await?).await
    }

    /// POST a JSON body and decode the envelope.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get`].
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiEnvelope<T>> {
        let response = self
            .http
            .post(self.url(path, &[])?)
            .header(CACHE_CONTROL, "no-store")
            .json(body)
            .send()
            .await?;
        read(response).await
    }
}

async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    tracing::debug!(%status, body = %text, "Storefront error response");
    Err(CliError::Api {
        status,
        message: error_message(&text).unwrap_or_else(|| status.to_string()),
    })
}

/// Pull a human-readable message out of an error body.
///
/// Storefront errors use the envelope's `message`; forwarded backend errors
/// keep the backend's own shape, which usually has `message` or `error`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
