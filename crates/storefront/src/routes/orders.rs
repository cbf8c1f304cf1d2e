//! Customer order history route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use bazaar_core::api::{ApiEnvelope, Listing, OrderSummary};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::types::UpstreamList;
use crate::backend::{Passthrough, UpstreamCall};
use crate::error::Result;
use crate::middleware::BearerToken;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub status: Option<String>,
}

/// GET /api/orders
///
/// Decodes the backend history so a schema drift fails loudly instead of
/// showing an empty history.
#[instrument(skip(state, token))]
pub async fn history(
    State(state): State<AppState>,
    token: BearerToken,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiEnvelope<Listing<OrderSummary>>>> {
    let backend = state.backend()?;
    let call = UpstreamCall::get("orders/history")
        .query_opt("page", query.page)
        .query_opt("status", query.status)
        .bearer(&token);

    let list: UpstreamList<OrderSummary> = backend.fetch(call).await?;
    Ok(Json(ApiEnvelope::ok(list.into())))
}

/// GET /api/orders/{order_no}
#[instrument(skip(state, token))]
pub async fn show(
    State(state): State<AppState>,
    token: BearerToken,
    Path(order_no): Path<String>,
) -> Result<Passthrough> {
    Ok(state
        .backend()?
        .passthrough(UpstreamCall::get("orders").segment(order_no).bearer(&token))
        .await?)
}
