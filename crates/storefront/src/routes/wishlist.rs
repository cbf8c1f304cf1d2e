//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use bazaar_core::api::{ApiEnvelope, WishlistStatus};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::backend::types::UpstreamWishlistCheck;
use crate::backend::{Passthrough, UpstreamCall};
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::BearerToken;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    #[serde(default)]
    pub slug: String,
}

/// GET /api/wishlist
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, token: BearerToken) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("wishlist").bearer(&token))
        .await?)
}

/// GET /api/wishlist/check?slug=...
#[instrument(skip(state, token))]
pub async fn check(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<CheckQuery>,
) -> Result<Json<ApiEnvelope<WishlistStatus>>> {
    let slug = query.slug.trim();
    if slug.is_empty() {
        return Err(AppError::BadRequest("Product slug is required".to_string()));
    }

    let check: UpstreamWishlistCheck = state
        .backend()?
        .fetch(
            UpstreamCall::get("wishlist/check")
                .query("slug", slug)
                .bearer(&token),
        )
        .await?;

    Ok(Json(ApiEnvelope::ok(WishlistStatus {
        slug: slug.to_string(),
        in_wishlist: check.in_wishlist,
    })))
}

/// POST /api/wishlist
#[instrument(skip_all)]
pub async fn toggle(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::post("wishlist/toggle").bearer(&token).json(body))
        .await?)
}
