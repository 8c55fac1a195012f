//! Catalog inspection and bulk maintenance.

use baby_sneakers_api::db::{PgProductRepository, ProductRepository};

use super::{CommandError, connect};

/// Log every product, newest first.
pub async fn list() -> Result<(), CommandError> {
    let repo = PgProductRepository::new(connect().await?);
    let products = repo.list().await?;

    tracing::info!("{} products", products.len());
    for product in products {
        tracing::info!(
            "  {}  {}  {}  {}  size {}",
            product.id,
            product.name,
            product.price,
            product.category.map_or("-", |c| c.as_str()),
            product.shoe_size.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

/// Delete every product.
pub async fn clear(confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("Refusing to delete every product without --yes".into());
    }

    let repo = PgProductRepository::new(connect().await?);
    let deleted = repo.delete_all().await?;
    tracing::info!(deleted, "Deleted all products");
    Ok(())
}
