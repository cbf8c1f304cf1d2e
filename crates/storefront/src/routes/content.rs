//! Content route handlers: categories, banners, CMS pages.
//!
//! Public, relayed verbatim.

use axum::extract::{Path, State};
use tracing::instrument;

use crate::backend::{Passthrough, UpstreamCall};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/categories
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("categories"))
        .await?)
}

/// GET /api/banners
#[instrument(skip(state))]
pub async fn banners(State(state): State<AppState>) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("banners"))
        .await?)
}

/// GET /api/pages/{slug}
#[instrument(skip(state))]
pub async fn page(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("pages").segment(slug))
        .await?)
}
