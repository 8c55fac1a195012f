//! Email diagnostics.
//!
//! # Environment Variables
//!
//! See `baby_sneakers_api::config` for the `EMAIL_*` and `GMAIL_*` variables.

use thiserror::Error;

use baby_sneakers_api::config::{ApiConfig, ConfigError};
use baby_sneakers_api::services::{EmailError, EmailService};

#[derive(Debug, Error)]
pub enum EmailCommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Email is not configured; set EMAIL_HOST/EMAIL_USER/EMAIL_PASS or GMAIL_USER/GMAIL_APP_PASSWORD")]
    NotConfigured,

    #[error("Failed to send test email: {0}")]
    Send(#[from] EmailError),
}

/// Send the diagnostic message to the contact inbox.
pub async fn test() -> Result<(), EmailCommandError> {
    let config = ApiConfig::from_env()?;
    let email_config = config.email.ok_or(EmailCommandError::NotConfigured)?;
    let service = EmailService::new(&email_config).map_err(EmailError::from)?;

    tracing::info!(inbox = service.inbox(), "Sending test email...");
    let message_id = service.send_test_email().await?;
    tracing::info!(%message_id, "Test email sent");
    Ok(())
}
