//! Request ID middleware for request tracing and correlation.
//!
//! Reuses the inbound `x-request-id` when an upstream proxy already set one,
//! otherwise generates a UUID v4. The ID is recorded on the current span,
//! tagged on the Sentry scope, stored in the request extensions as
//! [`RequestId`], and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound ID that is reused as-is.
const MAX_INBOUND_LEN: usize = 128;

/// Correlation ID for one storefront request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Take the ID from inbound headers, or generate a fresh one.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_INBOUND_LEN)
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |id| Self(id.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    request.extensions_mut().insert(request_id.clone());
    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_reuses_inbound_id() {
        let id = RequestId::from_headers(&headers("edge-42"));
        assert_eq!(id.as_str(), "edge-42");
    }

    #[test]
    fn test_generates_when_missing_or_blank() {
        let fresh = RequestId::from_headers(&HeaderMap::new());
        assert!(Uuid::parse_str(fresh.as_str()).is_ok());

        let blank = RequestId::from_headers(&headers("   "));
        assert!(Uuid::parse_str(blank.as_str()).is_ok());
    }

    #[test]
    fn test_oversized_inbound_id_is_replaced() {
        let long = "x".repeat(MAX_INBOUND_LEN + 1);
        let id = RequestId::from_headers(&headers(&long));
        assert_ne!(id.as_str(), long);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }
}
