//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_API_BASE` - Catalog API origin (default: `http://localhost:5177`)
//! - `STOREFRONT_PAYMENT_LINK` - Hosted payment page checkout hands off to
//! - `STOREFRONT_ADMIN_PASSPHRASE` - Admin gate passphrase, either an argon2
//!   PHC string or plaintext (hashed on load); without it the gate rejects
//!   every attempt
//! - `STOREFRONT_STATE_FILE` - Path of the JSON file holding persisted state
//! - `STOREFRONT_HTTP_TIMEOUT_SECS` - Request timeout for API calls

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::auth::{PasswordError, hash_password};

const DEFAULT_API_BASE: &str = "http://localhost:5177";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to hash admin passphrase: {0}")]
    Passphrase(#[from] PasswordError),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Origin of the catalog API
    pub api_base: Url,
    /// Hosted payment page used at checkout
    pub payment_link: Option<Url>,
    /// Argon2 PHC hash of the admin passphrase
    pub admin_passphrase_hash: Option<SecretString>,
    /// File backing the persisted state; in-memory when unset
    pub state_file: Option<PathBuf>,
    /// Per-request timeout; the transport default when unset
    pub http_timeout: Option<Duration>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = parse_url(
            "STOREFRONT_API_BASE",
            &non_empty(lookup("STOREFRONT_API_BASE"))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        )?;
        let payment_link = non_empty(lookup("STOREFRONT_PAYMENT_LINK"))
            .map(|raw| parse_url("STOREFRONT_PAYMENT_LINK", &raw))
            .transpose()?;

        let admin_passphrase_hash = match non_empty(lookup("STOREFRONT_ADMIN_PASSPHRASE")) {
            Some(value) if value.starts_with("$argon2") => Some(SecretString::from(value)),
            Some(plain) => Some(SecretString::from(hash_password(&plain)?)),
            None => None,
        };

        let http_timeout = non_empty(lookup("STOREFRONT_HTTP_TIMEOUT_SECS"))
            .map(|raw| {
                raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            api_base,
            payment_link,
            admin_passphrase_hash,
            state_file: non_empty(lookup("STOREFRONT_STATE_FILE")).map(PathBuf::from),
            http_timeout,
        })
    }

    /// Minimal configuration pointing at `api_base`: no payment link, no
    /// admin gate, in-memory state.
    #[must_use]
    pub fn for_api(api_base: Url) -> Self {
        Self {
            api_base,
            payment_link: None,
            admin_passphrase_hash: None,
            state_file: None,
            http_timeout: None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
