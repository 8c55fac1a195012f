//! Baby Sneakers API - catalog and contact service.
//!
//! Serves the REST API consumed by the storefront on port 5177.
//!
//! # Architecture
//!
//! - Axum web framework with JSON handlers
//! - `PostgreSQL` via sqlx for products and contact messages, or in-memory
//!   repositories when no database URL is configured
//! - SMTP via lettre for best-effort contact notifications
//!
//! Migrations are NOT run automatically on startup. Run them explicitly via:
//! `cargo run -p baby-sneakers-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use baby_sneakers_api::config::ApiConfig;
use baby_sneakers_api::services::EmailService;
use baby_sneakers_api::state::AppState;
use baby_sneakers_api::{app, db};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (needed for Sentry init)
    let config = ApiConfig::from_env()?;

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "baby_sneakers_api=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let email = match config.email.as_ref() {
        Some(email_config) => match EmailService::new(email_config) {
            Ok(service) => {
                tracing::info!(
                    relay = %email_config.smtp_host,
                    inbox = %email_config.inbox,
                    "Email relay configured"
                );
                Some(service)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Email relay unusable; contact messages will be stored only");
                None
            }
        },
        None => {
            tracing::warn!(
                "Email is not configured; contact messages will be stored only. \
                 Set GMAIL_USER and GMAIL_APP_PASSWORD, or EMAIL_HOST, EMAIL_USER and EMAIL_PASS"
            );
            None
        }
    };

    let state = match config.database_url.as_ref() {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Database pool created");
            AppState::with_pool(config.clone(), pool, email)
        }
        None => {
            tracing::warn!("API_DATABASE_URL is not set; using in-memory storage");
            AppState::in_memory(config.clone(), email)
        }
    };

    let router = app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
