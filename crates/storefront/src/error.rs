//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error body uses the `{ success, data, message }` envelope except
//! upstream errors with a JSON body, which are forwarded verbatim along with
//! the upstream status.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::api::ApiEnvelope;
use bazaar_core::order::CheckoutError;
use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;
use crate::orders::OrderStoreError;

/// Fixed message for missing backend configuration.
pub const CONFIG_ERROR_MESSAGE: &str = "Server configuration error";

/// Generic message for failures the client cannot act on.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend base URL or system key is not configured.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Local order file failed.
    #[error("Order store error: {0}")]
    Orders(#[from] OrderStoreError),

    /// Checkout request was invalid.
    #[error("Checkout rejected: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) | Self::Orders(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Backend(BackendError::Upstream { status, .. }) => *status,
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Checkout(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match self {
            Self::Config(_) => CONFIG_ERROR_MESSAGE.to_string(),
            Self::Backend(BackendError::Upstream {
                body: Some(body), ..
            }) => return (status, Json(body)).into_response(),
            Self::Backend(BackendError::Upstream { .. }) => "Upstream request failed".to_string(),
            Self::Backend(_) | Self::Orders(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg,
        };

        (status, Json(ApiEnvelope::<()>::failure(message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 123".to_string());
        assert_eq!(err.to_string(), "Not found: order 123");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Config(ConfigError::MissingEnvVar("BACKEND_BASE_URL".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unauthorized("no token".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::BadRequest("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::NoLines).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Checkout(CheckoutError::AmountOutOfRange).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Backend(BackendError::Upstream {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                body: None
            })
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_config_error_hides_variable_name() {
        let response =
            AppError::Config(ConfigError::MissingEnvVar("BACKEND_SYSTEM_KEY".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], CONFIG_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_upstream_body_forwarded_verbatim() {
        let upstream = serde_json::json!({ "error": "coupon expired", "code": 4102 });
        let response = AppError::Backend(BackendError::Upstream {
            status: StatusCode::CONFLICT,
            body: Some(upstream.clone()),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await, upstream);
    }

    #[tokio::test]
    async fn test_upstream_without_body_gets_generic_message() {
        let response = AppError::Backend(BackendError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            body: None,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["message"], "Upstream request failed");
    }
}
