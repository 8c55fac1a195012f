//! Seed the catalog from a YAML file.
//!
//! # File Format
//!
//! ```yaml
//! products:
//!   - name: Tiny Runner
//!     price: 39.99
//!     description: Soft mesh sneaker with a flexible sole
//!     category: kids
//!     shoeSize: "4"
//!     image: https://cdn.example.com/tiny-runner.jpg
//! ```
//!
//! Every entry is validated before the database is touched; one bad entry
//! aborts the whole seed.

use std::path::Path;

use serde::Deserialize;

use baby_sneakers_api::db::{PgProductRepository, ProductRepository};
use baby_sneakers_core::ProductDraft;

use super::connect;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    products: Vec<ProductDraft>,
}

/// Parse and validate seed products.
fn parse(content: &str) -> Result<Vec<ProductDraft>, String> {
    let file: SeedFile = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let mut errors = Vec::new();
    let drafts: Vec<ProductDraft> = file
        .products
        .into_iter()
        .map(ProductDraft::normalized)
        .enumerate()
        .map(|(index, draft)| {
            if let Err(e) = draft.validate() {
                errors.push(format!("product #{} ({}): {e}", index + 1, draft.name));
            }
            draft
        })
        .collect();

    if errors.is_empty() {
        Ok(drafts)
    } else {
        Err(errors.join("\n"))
    }
}

/// Insert the products listed in `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or a database operation fails.
pub async fn products(file_path: &str, clear_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    tracing::info!(path = %file_path, "Loading seed products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let drafts = parse(&content).map_err(|errors| {
        tracing::error!("Seed file validation failed:");
        for line in errors.lines() {
            tracing::error!("  - {line}");
        }
        "seed file contains invalid products"
    })?;
    tracing::info!(products = drafts.len(), "Seed file validated");

    let repo = PgProductRepository::new(connect().await?);
    if clear_existing {
        let deleted = repo.delete_all().await?;
        tracing::info!(deleted, "Cleared existing products");
    }

    for draft in &drafts {
        let product = repo.create(draft).await?;
        tracing::info!(id = %product.id, name = %product.name, "Inserted product");
    }

    tracing::info!("Seeding complete! {} products inserted", drafts.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use baby_sneakers_core::{Category, Price};

    use super::*;

    #[test]
    fn test_parses_products() {
        let drafts = parse(
            r#"
products:
  - name: "  Tiny Runner "
    price: 39.99
    description: Soft mesh sneaker
    category: kids
    shoeSize: "4"
  - name: Crib Walker
    price: 25
    description: First steps
"#,
        )
        .unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "Tiny Runner");
        assert_eq!(drafts[0].price, Price::from_cents(3999));
        assert_eq!(drafts[0].category, Some(Category::Kids));
        assert_eq!(drafts[1].shoe_size, None);
    }

    #[test]
    fn test_reports_every_invalid_entry() {
        let err = parse(
            r#"
products:
  - name: ""
    price: 10
    description: x
  - name: Ok
    price: 10
    description: ""
"#,
        )
        .unwrap_err();
        assert_eq!(err.lines().count(), 2);
        assert!(err.contains("product #1"));
        assert!(err.contains("product #2"));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        assert!(parse("products: [name: [").is_err());
    }
}
