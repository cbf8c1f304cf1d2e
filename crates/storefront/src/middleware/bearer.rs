//! Bearer token extractors.
//!
//! User-scoped routes take the caller's `Authorization: Bearer <token>`
//! header and forward the token to the backend unchanged. The storefront
//! never inspects or validates the token itself.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;

/// Message returned when a user-scoped route has no usable token.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";

/// A per-user credential taken from the inbound request.
///
/// `Debug` does not print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Parse an `Authorization` header value.
    ///
    /// The scheme is matched case-insensitively. Returns `None` for other
    /// schemes, an empty token, or a token containing whitespace or
    /// non-visible characters.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_graphic()) {
            return None;
        }
        Some(Self(token.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

fn extract(parts: &Parts) -> Option<BearerToken> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(BearerToken::from_header)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract(parts).ok_or_else(|| AppError::Unauthorized(AUTH_REQUIRED_MESSAGE.to_string()))
    }
}

/// Extractor that optionally takes a bearer token.
///
/// Unlike [`BearerToken`], this does not reject the request when the header
/// is missing or malformed.
#[derive(Debug, Clone)]
pub struct OptionalBearer(pub Option<BearerToken>);

impl<S> FromRequestParts<S> for OptionalBearer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(extract(parts)))
    }
}
