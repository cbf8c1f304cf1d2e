//! Coupon route handler.

use axum::{Json, extract::State};
use bazaar_core::Money;
use bazaar_core::api::{ApiEnvelope, AppliedCoupon};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::UpstreamCall;
use crate::backend::types::UpstreamCoupon;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::middleware::BearerToken;
use crate::state::AppState;

/// Coupon application request.
#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
    pub code: String,
    #[serde(default)]
    pub subtotal: Option<Money>,
}

/// POST /api/coupons/apply
///
/// A code the backend rejects is not an HTTP error: the response is 200
/// with `success: false` and the backend's reason, so the client can show
/// it next to the input.
#[instrument(skip(state, token, request), fields(code = %request.code.trim()))]
pub async fn apply(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(request): ApiJson<ApplyCouponRequest>,
) -> Result<Json<ApiEnvelope<AppliedCoupon>>> {
    let code = request.code.trim();
    if code.is_empty() {
        return Err(AppError::BadRequest("Coupon code is required".to_string()));
    }

    let backend = state.backend()?;
    let mut body = serde_json::json!({ "code": code });
    if let Some(subtotal) = request.subtotal {
        body["subtotal"] = serde_json::json!(subtotal);
    }

    let verdict: UpstreamCoupon = backend
        .fetch(UpstreamCall::post("coupons/apply").bearer(&token).json(body))
        .await?;

    let envelope = match verdict.discount {
        Some(discount) if verdict.valid => {
            tracing::info!(code = %verdict.code, discount = %discount, "Coupon applied");
            ApiEnvelope::ok(AppliedCoupon {
                code: verdict.code,
                discount,
            })
        }
        _ => ApiEnvelope::failure(
            verdict
                .message
                .unwrap_or_else(|| "Coupon code is not valid".to_string()),
        ),
    };
    Ok(Json(envelope))
}
