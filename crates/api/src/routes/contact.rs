//! Contact form route handlers.
//!
//! Messages are always persisted; the email notification is best-effort and
//! its outcome is reported back in `emailStatus` instead of failing the
//! request.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use baby_sneakers_core::{ContactMessage, ContactSubmission};

use crate::error::{ApiJson, Result, add_breadcrumb};
use crate::state::AppState;

/// Outcome of the notification relay.
#[derive(Debug, Serialize)]
pub struct EmailStatus {
    pub sent: bool,
    pub error: Option<String>,
}

/// Stored message plus relay outcome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    #[serde(flatten)]
    pub message: ContactMessage,
    pub email_status: EmailStatus,
}

/// Submit a contact message.
///
/// POST /api/contact
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    let (name, email, message) = form.validate()?;

    let record = state.contacts().create(&name, &email, &message).await?;
    add_breadcrumb("contact", "Contact message stored", Some(&[("id", record.id.as_str())]));

    let email_status = match state.email() {
        None => {
            tracing::warn!(id = %record.id, "Email not configured; contact message stored only");
            EmailStatus {
                sent: false,
                error: Some("Email not configured - check server logs".to_string()),
            }
        }
        Some(mailer) => match mailer.send_contact_notification(&name, &email, &message).await {
            Ok(message_id) => {
                tracing::info!(id = %record.id, message_id = %message_id, "Contact notification sent");
                EmailStatus {
                    sent: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(id = %record.id, error = %e, "Contact notification failed; message stored");
                EmailStatus {
                    sent: false,
                    error: Some(e.to_string()),
                }
            }
        },
    };

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: record,
            email_status,
        }),
    ))
}
