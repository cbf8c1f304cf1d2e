//! Warranty route handlers. All relayed verbatim with the caller's token.

use axum::extract::State;
use serde_json::Value;
use tracing::instrument;

use crate::backend::{Passthrough, UpstreamCall};
use crate::error::{Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::middleware::BearerToken;
use crate::state::AppState;

/// POST /api/warranty/activate
#[instrument(skip_all)]
pub async fn activate(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    add_breadcrumb("warranty", "Warranty activation", None);
    Ok(backend
        .passthrough(UpstreamCall::post("warranty/activate").bearer(&token).json(body))
        .await?)
}

/// POST /api/warranty/claim
#[instrument(skip_all)]
pub async fn claim(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    add_breadcrumb("warranty", "Warranty claim", None);
    Ok(backend
        .passthrough(UpstreamCall::post("warranty/claim").bearer(&token).json(body))
        .await?)
}

/// GET /api/warranty
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, token: BearerToken) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("warranty").bearer(&token))
        .await?)
}
