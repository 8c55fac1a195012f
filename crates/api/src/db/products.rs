//! `PostgreSQL` product repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use baby_sneakers_core::{Category, Price, Product, ProductDraft, ProductId};

use super::{ProductRepository, RepositoryError, new_id};

const PRODUCT_COLUMNS: &str =
    "id, name, price, description, image, category, shoe_size, created_at, updated_at";

/// Row shape of `catalog.products`.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: Decimal,
    description: String,
    image: Option<String>,
    category: Option<String>,
    shoe_size: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        let category = row
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
            })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            price,
            description: row.description,
            image: row.image,
            category,
            shoe_size: row.shoe_size,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        })
    }
}

/// Product repository backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            r"
            INSERT INTO catalog.products (id, name, price, description, image, category, shoe_size)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(new_id())
        .bind(&draft.name)
        .bind(draft.price.amount())
        .bind(&draft.description)
        .bind(draft.image.as_deref())
        .bind(draft.category.map(|c| c.as_str()))
        .bind(draft.shoe_size.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r"
            UPDATE catalog.products
            SET name = $2,
                price = $3,
                description = $4,
                image = COALESCE($5, image),
                category = $6,
                shoe_size = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(draft.price.amount())
        .bind(&draft.description)
        .bind(draft.image.as_deref())
        .bind(draft.category.map(|c| c.as_str()))
        .bind(draft.shoe_size.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
            .and_then(Product::try_from)
    }

    async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "DELETE FROM catalog.products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)
            .and_then(Product::try_from)
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.products")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
