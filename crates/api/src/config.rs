//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either the API runs on in-memory storage)
//! - `API_HOST` - Bind address (default: 127.0.0.1)
//! - `API_PORT` - Listen port (default: 5177)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//!
//! ## Email (all optional; contact messages are stored either way)
//! - `EMAIL_HOST`, `EMAIL_USER`, `EMAIL_PASS` - Custom SMTP relay
//! - `EMAIL_PORT` - SMTP port (default: 587)
//! - `EMAIL_SECURE` - `true` for implicit TLS (port 465), otherwise STARTTLS
//! - `GMAIL_USER`, `GMAIL_APP_PASSWORD` - Gmail fallback when no custom relay is set
//! - `EMAIL_FROM` - Sender address (default: the SMTP user)
//! - `CONTACT_INBOX` - Where contact notifications go (default: the SMTP user)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const FALLBACK_FROM_ADDRESS: &str = "noreply@babysneakers.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// SMTP relay for contact notifications
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// SMTP configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// Connect with implicit TLS instead of STARTTLS
    pub implicit_tls: bool,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password or app password
    pub smtp_password: SecretString,
    /// Sender address
    pub from_address: String,
    /// Recipient of contact form notifications
    pub inbox: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("implicit_tls", &self.implicit_tls)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("inbox", &self.inbox)
            .finish()
    }
}

impl ApiConfig {
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
        let database_url = lookup("API_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from);
        let host = parse_var(lookup, "API_HOST", "127.0.0.1")?;
        let port = parse_var(lookup, "API_PORT", "5177")?;

        Ok(Self {
            database_url,
            host,
            port,
            email: EmailConfig::from_lookup(lookup)?,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Configuration for tests and local runs: in-memory storage, no email.
    #[must_use]
    pub fn local() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl EmailConfig {
    /// Select the SMTP relay: a custom relay wins over the Gmail fallback;
    /// with neither configured, email is disabled.
    fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Option<Self>, ConfigError> {
        let custom = (
            non_empty(lookup("EMAIL_HOST")),
            non_empty(lookup("EMAIL_USER")),
            non_empty(lookup("EMAIL_PASS")),
        );

        let (smtp_host, smtp_port, implicit_tls, username, password) = match custom {
            (Some(host), Some(user), Some(pass)) => {
                let port = parse_var(lookup, "EMAIL_PORT", "587")?;
                let secure = lookup("EMAIL_SECURE").is_some_and(|v| v == "true");
                (host, port, secure, user, pass)
            }
            _ => match (
                non_empty(lookup("GMAIL_USER")),
                non_empty(lookup("GMAIL_APP_PASSWORD")),
            ) {
                (Some(user), Some(pass)) => (
                    GMAIL_SMTP_HOST.to_string(),
                    DEFAULT_SMTP_PORT,
                    false,
                    user,
                    pass,
                ),
                _ => return Ok(None),
            },
        };

        let from_address = non_empty(lookup("EMAIL_FROM"))
            .or_else(|| username.contains('@').then(|| username.clone()))
            .unwrap_or_else(|| FALLBACK_FROM_ADDRESS.to_string());
        let inbox = non_empty(lookup("CONTACT_INBOX")).unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            implicit_tls,
            smtp_username: username,
            smtp_password: SecretString::from(password),
            from_address,
            inbox,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_var<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
