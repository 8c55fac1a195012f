//! Catalog products and the shared input validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A single rule violation on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire.
    pub field: &'static str,
    /// Human-readable description of the problem.
    pub message: &'static str,
}

/// Input rejected because one or more required fields are missing or invalid.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", summarize(.0))]
pub struct ValidationError(Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    let fields: Vec<String> = errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect();
    format!("Missing or invalid fields: {}", fields.join(", "))
}

impl ValidationError {
    /// Build an error for a single field.
    #[must_use]
    pub fn field(field: &'static str, message: &'static str) -> Self {
        Self(vec![FieldError { field, message }])
    }

    /// The individual field violations.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether the given field is among the violations.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Turn a list of collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `errors` is non-empty.
    pub fn check(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self(errors))
        }
    }
}

/// A product as held in the catalog.
///
/// The API serializes its primary key as `id`; legacy payloads using `_id`
/// are accepted on input so older snapshots and servers still normalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    /// Remote URL or base64 `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Free-text shoe size ("4", "EU 21", "6-12 months").
    #[serde(default, alias = "shoeNo", skip_serializing_if = "Option::is_none")]
    pub shoe_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Build a product from a draft under the given id, without timestamps.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: draft.price,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            shoe_size: draft.shoe_size,
            created_at: None,
            updated_at: None,
        }
    }

    /// The editable fields of this product.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            image: self.image.clone(),
            category: self.category,
            shoe_size: self.shoe_size.clone(),
        }
    }

    /// Whether the editable fields equal the draft (id and timestamps ignored).
    #[must_use]
    pub fn matches_draft(&self, draft: &ProductDraft) -> bool {
        self.to_draft() == *draft
    }
}

/// The fields submitted when creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(default)]
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, alias = "shoeNo", skip_serializing_if = "Option::is_none")]
    pub shoe_size: Option<String>,
}

impl ProductDraft {
    /// Trim text fields and collapse blank optional fields to `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            price: self.price,
            description: self.description.trim().to_owned(),
            image: non_blank(self.image),
            category: self.category,
            shoe_size: non_blank(self.shoe_size.map(|s| s.trim().to_owned())),
        }
    }

    /// Check the required fields: name and description must be non-blank.
    ///
    /// Price sign is already enforced by [`Price`].
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every blank required field and
    /// a price the catalog cannot store exactly.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "is required",
            });
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError {
                field: "description",
                message: "is required",
            });
        }
        if !self.price.is_whole_cents() {
            errors.push(FieldError {
                field: "price",
                message: "must have at most 2 decimal places",
            });
        } else if self.price > Price::max_storable() {
            errors.push(FieldError {
                field: "price",
                message: "is too large",
            });
        }
        ValidationError::check(errors)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "  Tiny Runner ".to_string(),
            price: Price::from_cents(3999),
            description: "Soft sole".to_string(),
            image: Some(String::new()),
            category: Some(Category::Kids),
            shoe_size: Some(" 4 ".to_string()),
        }
    }

    #[test]
    fn test_normalized_trims_and_drops_blanks() {
        let d = draft().normalized();
        assert_eq!(d.name, "Tiny Runner");
        assert_eq!(d.image, None);
        assert_eq!(d.shoe_size.as_deref(), Some("4"));
    }

    #[test]
    fn test_validate_lists_every_blank_field() {
        let mut d = draft();
        d.name = "   ".to_string();
        d.description = String::new();
        let err = d.validate().unwrap_err();
        assert!(err.has_field("name"));
        assert!(err.has_field("description"));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_validate_price_must_be_storable() {
        let mut d = draft();
        d.price = Price::parse("19.999").unwrap();
        assert!(d.validate().unwrap_err().has_field("price"));

        d.price = Price::parse("10000000000").unwrap();
        assert!(d.validate().unwrap_err().has_field("price"));

        d.price = Price::max_storable();
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_accepts_legacy_id_and_shoe_no() {
        let json = r#"{"_id":"abc","name":"Jordan Mini","price":80,"description":"d","shoeNo":"5"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "abc");
        assert_eq!(product.shoe_size.as_deref(), Some("5"));
        assert_eq!(product.price, Price::from_cents(8000));
    }

    #[test]
    fn test_draft_requires_numeric_price() {
        let json = r#"{"name":"a","price":"12","description":"d"}"#;
        assert!(serde_json::from_str::<ProductDraft>(json).is_err());
    }

    #[test]
    fn test_matches_draft_ignores_id() {
        let d = draft().normalized();
        let product = Product::from_draft(ProductId::new("x"), d.clone());
        assert!(product.matches_draft(&d));
    }
}
