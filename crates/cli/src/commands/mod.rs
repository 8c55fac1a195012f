//! Subcommand implementations.

pub mod email;
pub mod migrate;
pub mod products;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use baby_sneakers_api::config::{ApiConfig, ConfigError};
use baby_sneakers_api::db::{self, RepositoryError};

/// Errors shared by the database-backed commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Connect to the catalog database named by `API_DATABASE_URL` (or
/// `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    let config = ApiConfig::from_env()?;
    let database_url = config
        .database_url
        .ok_or(CommandError::MissingEnvVar("API_DATABASE_URL"))?;

    tracing::info!("Connecting to catalog database...");
    Ok(db::create_pool(&database_url).await?)
}
