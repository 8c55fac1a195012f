//! Persistence for the catalog and contact messages.
//!
//! # Database: `PostgreSQL`
//!
//! ## Tables (schema `catalog`)
//!
//! - `products` - Sellable products, listed newest first
//! - `contact_messages` - Contact form submissions
//!
//! Handlers talk to the [`ProductRepository`] and [`ContactRepository`]
//! traits. The `PostgreSQL` implementations live in [`products`] and
//! [`contacts`]; [`memory`] holds in-process implementations used by tests
//! and by database-less local runs.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and embedded at compile
//! time. They run via:
//! ```bash
//! cargo run -p baby-sneakers-cli -- migrate
//! ```

pub mod contacts;
pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use baby_sneakers_core::{ContactMessage, Email, Product, ProductDraft, ProductId};

pub use contacts::PgContactRepository;
pub use memory::{MemoryContactRepository, MemoryProductRepository};
pub use products::PgProductRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Storage for catalog products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, most recently created first.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Insert a product under a freshly assigned id.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError>;

    /// Replace the editable fields of a product.
    ///
    /// A draft without an image keeps the stored image.
    async fn update(&self, id: &ProductId, draft: &ProductDraft)
    -> Result<Product, RepositoryError>;

    /// Delete one product, returning the removed record.
    async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError>;

    /// Delete every product, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Storage for contact form messages.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a validated contact message.
    async fn create(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<ContactMessage, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history diverges.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Generate a new server-side product or contact id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
