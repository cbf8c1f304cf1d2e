//! Dealer portal route handlers.
//!
//! Applying to become a dealer is public; the catalog and order views need
//! a dealer's bearer token.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::backend::{Passthrough, UpstreamCall};
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::BearerToken;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DealerQuery {
    pub page: Option<u32>,
    pub category: Option<String>,
}

/// GET /api/dealer/products
#[instrument(skip(state, token))]
pub async fn products(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<DealerQuery>,
) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(
            UpstreamCall::get("dealer/products")
                .query_opt("page", query.page)
                .query_opt("category", query.category)
                .bearer(&token),
        )
        .await?)
}

/// GET /api/dealer/orders
#[instrument(skip(state, token))]
pub async fn orders(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<DealerQuery>,
) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(
            UpstreamCall::get("dealer/orders")
                .query_opt("page", query.page)
                .bearer(&token),
        )
        .await?)
}

/// POST /api/dealer/apply
#[instrument(skip_all)]
pub async fn apply(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::post("dealer/apply").json(body))
        .await?)
}
