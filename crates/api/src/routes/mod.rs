//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /api/health            - Liveness probe ({ "ok": true })
//! GET    /api/health/ready      - Readiness probe (checks the product store)
//!
//! # Products
//! GET    /api/products          - All products, newest first
//! POST   /api/products          - Create a product (JSON)
//! PUT    /api/products/{id}     - Update a product (JSON or multipart)
//! DELETE /api/products/{id}     - Delete a product
//! DELETE /api/products          - Delete every product
//!
//! # Contact
//! POST   /api/contact           - Store a contact message, relay by email
//! POST   /api/test-email        - Send a diagnostic email
//! ```

pub mod contact;
pub mod email;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
        .route("/api/contact", post(contact::submit))
        .route("/api/test-email", post(email::send_test))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list)
                .post(products::create)
                .delete(products::delete_all),
        )
        .route("/{id}", put(products::update).delete(products::delete))
}
