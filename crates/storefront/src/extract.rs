//! Request extractors that reject with the storefront error envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON request body.
///
/// Same as [`axum::Json`], but a missing content type, malformed JSON, or a
/// body that does not match `T` becomes a 400 envelope via [`AppError`].
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
