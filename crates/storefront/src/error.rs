//! Error taxonomy for the storefront client.
//!
//! Only three outcomes reach callers of remote operations: the input was rejected, the API could
//! not be reached (or answered with a failure), or the record does not exist
//! remotely. Local persistence failures never surface here; they are logged
//! by [`crate::storage`].

use baby_sneakers_core::ValidationError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;

/// Errors returned by remote catalog and contact operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Input was rejected, locally or by the API (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// Transport failure or a non-success status from the API.
    #[error("Network error: {0}")]
    Network(String),

    /// The API has no record with this id (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    /// Whether a catalog mutation may fall back to a local-only change.
    #[must_use]
    pub const fn allows_local_fallback(&self) -> bool {
        matches!(self, Self::Network(_) | Self::NotFound(_))
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Errors that prevent a [`crate::Storefront`] from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build API client: {0}")]
    Client(#[from] ClientError),

    #[error("failed to open state store: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_from_core_error() {
        let err = ClientError::from(ValidationError::field("name", "is required"));
        assert_eq!(
            err,
            ClientError::Validation("Missing or invalid fields: name is required".to_string())
        );
        assert!(!err.allows_local_fallback());
    }

    #[test]
    fn test_fallback_kinds() {
        assert!(ClientError::Network("down".to_string()).allows_local_fallback());
        assert!(ClientError::NotFound("x".to_string()).allows_local_fallback());
    }
}
