//! `PostgreSQL` contact message repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use baby_sneakers_core::{ContactId, ContactMessage, Email};

use super::{ContactRepository, RepositoryError, new_id};

#[derive(Debug, sqlx::FromRow)]
struct ContactRow {
    id: String,
    name: String,
    email: String,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for ContactMessage {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Contact message repository backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Create a new contact message repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<ContactMessage, RepositoryError> {
        let row: ContactRow = sqlx::query_as(
            r"
            INSERT INTO catalog.contact_messages (id, name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, message, created_at, updated_at
            ",
        )
        .bind(new_id())
        .bind(name)
        .bind(email.as_str())
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
