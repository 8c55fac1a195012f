//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::{
    ContactRepository, MemoryContactRepository, MemoryProductRepository, PgContactRepository,
    PgProductRepository, ProductRepository,
};
use crate::services::EmailService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the repositories, the optional email relay, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    products: Arc<dyn ProductRepository>,
    contacts: Arc<dyn ContactRepository>,
    email: Option<EmailService>,
}

impl AppState {
    /// Create application state from explicit parts.
    #[must_use]
    pub fn new(
        config: ApiConfig,
        products: Arc<dyn ProductRepository>,
        contacts: Arc<dyn ContactRepository>,
        email: Option<EmailService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                contacts,
                email,
            }),
        }
    }

    /// State backed by `PostgreSQL` repositories.
    #[must_use]
    pub fn with_pool(config: ApiConfig, pool: PgPool, email: Option<EmailService>) -> Self {
        Self::new(
            config,
            Arc::new(PgProductRepository::new(pool.clone())),
            Arc::new(PgContactRepository::new(pool)),
            email,
        )
    }

    /// State backed by fresh in-memory repositories.
    #[must_use]
    pub fn in_memory(config: ApiConfig, email: Option<EmailService>) -> Self {
        Self::new(
            config,
            Arc::new(MemoryProductRepository::new()),
            Arc::new(MemoryContactRepository::new()),
            email,
        )
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the product repository.
    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.inner.products.as_ref()
    }

    /// Get the contact message repository.
    #[must_use]
    pub fn contacts(&self) -> &dyn ContactRepository {
        self.inner.contacts.as_ref()
    }

    /// Get the email relay, if one is configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}
