//! Product catalog route handlers.
//!
//! Listings and search results are decoded into [`ProductSummary`] and
//! returned in the `{ success, data }` envelope. Product detail is relayed
//! as the backend sends it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use bazaar_core::api::{ApiEnvelope, Listing, ProductSummary};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::types::UpstreamList;
use crate::backend::{Passthrough, UpstreamCall};
use crate::error::{AppError, Result};
use crate::middleware::OptionalBearer;
use crate::state::AppState;

/// Query parameters for product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
}

/// GET /api/products
#[instrument(skip(state, bearer))]
pub async fn index(
    State(state): State<AppState>,
    OptionalBearer(bearer): OptionalBearer,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ApiEnvelope<Listing<ProductSummary>>>> {
    let backend = state.backend()?;
    let call = UpstreamCall::get("products")
        .query_opt("category", query.category)
        .query_opt("page", query.page)
        .query_opt("limit", query.limit)
        .query_opt("sort", query.sort)
        .bearer_opt(bearer.as_ref());

    let list: UpstreamList<ProductSummary> = backend.fetch(call).await?;
    Ok(Json(ApiEnvelope::ok(list.into())))
}

/// GET /api/products/search
#[instrument(skip(state, bearer))]
pub async fn search(
    State(state): State<AppState>,
    OptionalBearer(bearer): OptionalBearer,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiEnvelope<Listing<ProductSummary>>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }

    let backend = state.backend()?;
    let call = UpstreamCall::get("products/search")
        .query("q", q)
        .query_opt("page", query.page)
        .bearer_opt(bearer.as_ref());

    let list: UpstreamList<ProductSummary> = backend.fetch(call).await?;
    Ok(Json(ApiEnvelope::ok(list.into())))
}

/// GET /api/products/{slug}
#[instrument(skip(state, bearer))]
pub async fn show(
    State(state): State<AppState>,
    OptionalBearer(bearer): OptionalBearer,
    Path(slug): Path<String>,
) -> Result<Passthrough> {
    let backend = state.backend()?;
    Ok(backend
        .passthrough(
            UpstreamCall::get("products")
                .segment(slug)
                .bearer_opt(bearer.as_ref()),
        )
        .await?)
}
