//! Contact form route handler.

use axum::{Json, extract::State};
use bazaar_core::Email;
use bazaar_core::api::ApiEnvelope;
use serde::Deserialize;
use tracing::instrument;

use crate::backend::UpstreamCall;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// POST /api/contact
///
/// Validates the form locally so obvious mistakes never reach the backend.
#[instrument(skip(state, form), fields(email = %form.email.trim()))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<Json<ApiEnvelope<()>>> {
    let Ok(email) = Email::parse(&form.email) else {
        return Err(AppError::BadRequest(
            "Please enter a valid email address.".to_string(),
        ));
    };
    let name = form.name.trim();
    let message = form.message.trim();
    if name.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required.".to_string(),
        ));
    }

    let backend = state.backend()?;
    let body = serde_json::json!({
        "name": name,
        "email": email.as_str(),
        "phone": form.phone.as_deref().map(str::trim).unwrap_or(""),
        "subject": form.subject.as_deref().map(str::trim).unwrap_or(""),
        "message": message,
    });
    backend.send(UpstreamCall::post("contact").json(body)).await?;

    add_breadcrumb("contact", "Contact form submitted", Some(&[("domain", email.domain())]));
    tracing::info!(email = %email, "Contact form relayed");

    Ok(Json(ApiEnvelope {
        success: true,
        data: None,
        message: Some("Thanks for reaching out. We'll get back to you soon.".to_string()),
    }))
}
