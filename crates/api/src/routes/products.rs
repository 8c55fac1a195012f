//! Product catalog route handlers.
//!
//! Creation takes JSON. Updates take either JSON or `multipart/form-data`;
//! in the multipart form an uploaded `image` file is stored inline as a
//! base64 `data:` URL so the catalog has no separate asset store.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use tracing::instrument;

use baby_sneakers_core::{
    Category, FieldError, Price, Product, ProductDraft, ProductId, ValidationError,
};

use crate::db::RepositoryError;
use crate::error::{AppError, ApiJson, Result, add_breadcrumb};
use crate::state::AppState;

/// Response for a single deletion.
#[derive(Debug, Serialize)]
pub struct DeletedProduct {
    pub message: &'static str,
    pub product: Product,
}

/// Response for a bulk deletion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProducts {
    pub message: &'static str,
    pub deleted_count: u64,
}

fn not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Product not found".to_string()),
        other => AppError::Database(other),
    }
}

/// List all products, newest first.
///
/// GET /api/products
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state.products().list().await?;
    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

/// Create a product.
///
/// POST /api/products
#[instrument(skip(state, draft), fields(name = %draft.name))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = draft.normalized();
    draft.validate()?;

    let product = state.products().create(&draft).await?;
    add_breadcrumb("catalog", "Product created", Some(&[("id", product.id.as_str())]));
    tracing::info!(id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product from JSON or multipart form data.
///
/// PUT /api/products/{id}
#[instrument(skip(state, request), fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    request: Request,
) -> Result<Json<Product>> {
    let draft = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state).await?;
        draft_from_multipart(multipart).await?
    } else {
        let ApiJson(draft) = ApiJson::<ProductDraft>::from_request(request, &state).await?;
        draft
    };
    let draft = draft.normalized();
    draft.validate()?;

    let product = state
        .products()
        .update(&id, &draft)
        .await
        .map_err(not_found)?;
    tracing::info!(id = %product.id, "Product updated");

    Ok(Json(product))
}

/// Delete a single product.
///
/// DELETE /api/products/{id}
#[instrument(skip(state), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<DeletedProduct>> {
    let product = state.products().delete(&id).await.map_err(not_found)?;
    add_breadcrumb("catalog", "Product deleted", Some(&[("id", id.as_str())]));
    tracing::info!(id = %id, "Product deleted");

    Ok(Json(DeletedProduct {
        message: "Product deleted successfully",
        product,
    }))
}

/// Delete every product.
///
/// DELETE /api/products
#[instrument(skip(state))]
pub async fn delete_all(State(state): State<AppState>) -> Result<Json<DeletedProducts>> {
    let deleted_count = state.products().delete_all().await?;
    tracing::warn!(deleted_count, "All products deleted");

    Ok(Json(DeletedProducts {
        message: "All products deleted successfully",
        deleted_count,
    }))
}

// =============================================================================
// Multipart
// =============================================================================

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Collect a [`ProductDraft`] from form fields.
///
/// `image` is either an uploaded file (inlined as a data URL) or a plain URL
/// string. `shoeNo` is accepted as an alias of `shoeSize`.
async fn draft_from_multipart(mut multipart: Multipart) -> Result<ProductDraft> {
    let mut name = String::new();
    let mut description = String::new();
    let mut price_text = None;
    let mut category_text = None;
    let mut shoe_size = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field_name.as_str() {
            "name" => name = field.text().await?,
            "description" => description = field.text().await?,
            "price" => price_text = Some(field.text().await?),
            "category" => category_text = Some(field.text().await?),
            "shoeSize" | "shoeNo" => shoe_size = Some(field.text().await?),
            "image" => {
                let content_type = field.content_type().map(str::to_owned);
                let is_file = field.file_name().is_some()
                    || content_type.as_deref().is_some_and(|ct| ct.starts_with("image/"));
                if is_file {
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        let content_type =
                            content_type.unwrap_or_else(|| "application/octet-stream".to_string());
                        image = Some(format!(
                            "data:{content_type};base64,{}",
                            STANDARD.encode(&bytes)
                        ));
                    }
                } else {
                    image = Some(field.text().await?);
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    let mut errors = Vec::new();
    let price = match price_text.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError {
                field: "price",
                message: "is required",
            });
            None
        }
        Some(text) => Price::parse(text).map_or_else(
            |_| {
                errors.push(FieldError {
                    field: "price",
                    message: "must be a non-negative number",
                });
                None
            },
            Some,
        ),
    };
    let category = match category_text.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => text.parse::<Category>().map_or_else(
            |_| {
                errors.push(FieldError {
                    field: "category",
                    message: "must be one of men, women, kids",
                });
                None
            },
            Some,
        ),
    };
    ValidationError::check(errors)?;

    Ok(ProductDraft {
        name,
        price: price.unwrap_or(Price::ZERO),
        description,
        image,
        category,
        shoe_size,
    })
}
