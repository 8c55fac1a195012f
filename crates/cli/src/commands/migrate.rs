//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bs-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `API_DATABASE_URL` - `PostgreSQL` connection string (fallback `DATABASE_URL`)
//!
//! Migrations live in `crates/api/migrations/` and are embedded in the
//! binary at build time.

use super::{CommandError, connect};

/// Run the catalog database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running catalog migrations...");
    baby_sneakers_api::db::run_migrations(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
