//! Contact form messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::FieldError;
use super::{ContactId, Email, ValidationError};

/// A contact form submission as entered by the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactSubmission {
    /// Validate the submission, returning the trimmed fields and parsed email.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when any field is blank or the email is
    /// not a valid address.
    pub fn validate(&self) -> Result<(String, Email, String), ValidationError> {
        let name = self.name.trim();
        let message = self.message.trim();
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "is required",
            });
        }
        let email = if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: "email",
                message: "is required",
            });
            None
        } else if let Ok(email) = Email::parse(&self.email) {
            Some(email)
        } else {
            errors.push(FieldError {
                field: "email",
                message: "is not a valid address",
            });
            None
        };
        if message.is_empty() {
            errors.push(FieldError {
                field: "message",
                message: "is required",
            });
        }

        ValidationError::check(errors)?;
        let email = email.ok_or_else(|| ValidationError::field("email", "is required"))?;
        Ok((name.to_owned(), email, message.to_owned()))
    }
}

/// A stored contact message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    #[serde(alias = "_id")]
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
