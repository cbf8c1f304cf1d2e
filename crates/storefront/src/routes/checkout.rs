//! Local checkout route handlers.
//!
//! The only routes that do not call the backend. Orders are validated,
//! priced from the submitted lines, and appended to the local order file.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use bazaar_core::OrderId;
use bazaar_core::api::ApiEnvelope;
use bazaar_core::order::{CheckoutRequest, PlacedOrder};
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::middleware::RequestId;
use crate::state::AppState;

/// POST /api/checkout/orders
#[instrument(skip(state, request_id, request), fields(lines = request.lines.len()))]
pub async fn place(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> Result<(StatusCode, Json<ApiEnvelope<PlacedOrder>>)> {
    let order = request.into_order(OrderId::generate(), Utc::now())?;

    state.orders().append(order.clone()).await?;

    let id = order.id.to_string();
    let request_id = request_id.map(|Extension(rid)| rid);
    let request_id = request_id.as_ref().map_or("", RequestId::as_str);
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_id", id.as_str()), ("request_id", request_id)]),
    );
    tracing::info!(
        order_id = %order.id,
        request_id,
        subtotal = %order.subtotal,
        lines = order.lines.len(),
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok_with_message(order, "Order placed")),
    ))
}

/// GET /api/checkout/orders/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope<PlacedOrder>>> {
    let id: OrderId = id
        .parse()
        .map_err(|_| AppError::NotFound("Order not found".to_string()))?;

    let order = state
        .orders()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    Ok(Json(ApiEnvelope::ok(order)))
}
