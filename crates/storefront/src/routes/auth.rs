//! Account route handlers.
//!
//! Login and signup are relayed to the backend unchanged. The backend owns
//! credentials and issues the bearer token the client sends on later calls.

use axum::extract::State;
use serde_json::Value;
use tracing::instrument;

use crate::backend::{Passthrough, UpstreamCall};
use crate::error::{Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::middleware::BearerToken;
use crate::state::AppState;

/// POST /api/auth/login
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    add_breadcrumb("auth", "Login attempt", None);
    Ok(backend
        .passthrough(UpstreamCall::post("auth/login").json(body))
        .await?)
}

/// POST /api/auth/signup
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    add_breadcrumb("auth", "Signup attempt", None);
    Ok(backend
        .passthrough(UpstreamCall::post("auth/signup").json(body))
        .await?)
}

/// POST /api/auth/logout
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, token: BearerToken) -> Result<Passthrough> {
    let backend = state.backend()?;
    Ok(backend
        .passthrough(UpstreamCall::post("auth/logout").bearer(&token))
        .await?)
}

/// GET /api/auth/profile
#[instrument(skip_all)]
pub async fn profile(State(state): State<AppState>, token: BearerToken) -> Result<Passthrough> {
    let backend = state.backend()?;
    Ok(backend
        .passthrough(UpstreamCall::get("auth/profile").bearer(&token))
        .await?)
}

/// POST /api/auth/profile
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    Ok(backend
        .passthrough(
            UpstreamCall::post("auth/profile/update")
                .bearer(&token)
                .json(body),
        )
        .await?)
}
