//! Email diagnostics.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailResponse {
    pub success: bool,
    pub message: &'static str,
    pub message_id: String,
}

/// Send a diagnostic email to the configured inbox.
///
/// POST /api/test-email
#[instrument(skip(state))]
pub async fn send_test(State(state): State<AppState>) -> Result<Json<TestEmailResponse>> {
    let mailer = state.email().ok_or(AppError::EmailNotConfigured)?;
    let message_id = mailer.send_test_email().await?;
    tracing::info!(to = %mailer.inbox(), message_id = %message_id, "Test email sent");

    Ok(Json(TestEmailResponse {
        success: true,
        message: "Test email sent successfully",
        message_id,
    }))
}
