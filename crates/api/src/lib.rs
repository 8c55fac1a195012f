//! Baby Sneakers catalog API library.
//!
//! Serves the product catalog and the contact form over JSON. The binary in
//! `main.rs` wires configuration, Sentry, and the database; everything else
//! lives here so the router can be exercised in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, body::Body, extract::DefaultBodyLimit, http::Request};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Maximum accepted request body, sized for inline base64 product images.
pub const BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    routes::routes()
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::{StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;
    use crate::middleware::REQUEST_ID_HEADER;
    use crate::services::EmailService;

    fn test_app(email: Option<EmailService>) -> Router {
        app(AppState::in_memory(ApiConfig::local(), email))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn sneaker() -> Value {
        json!({
            "name": "Tiny Runner",
            "price": 39.99,
            "description": "Soft sole first walkers",
            "category": "kids",
            "shoeSize": "4"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(None);
        let (status, body) = send(&app, empty_request("GET", "/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (status, _) = send(&app, empty_request("GET", "/api/health/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_every_response_has_request_id() {
        let response = test_app(None)
            .oneshot(empty_request("GET", "/api/products"))
            .await
            .unwrap();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let app = test_app(None);
        let (status, created) = send(&app, json_request("POST", "/api/products", &sneaker())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Tiny Runner");
        assert_eq!(created["price"], 39.99);
        assert_eq!(created["shoeSize"], "4");
        assert!(created["id"].is_string());
        assert!(created["createdAt"].is_string());

        let (status, list) = send(&app, empty_request("GET", "/api/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let app = test_app(None);
        let body = json!({ "name": " ", "price": 10, "description": "" });
        let (status, err) = send(&app, json_request("POST", "/api/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = err["error"].as_str().unwrap();
        assert!(message.contains("name"));
        assert!(message.contains("description"));
    }

    #[tokio::test]
    async fn test_create_rejects_string_and_negative_price() {
        let app = test_app(None);
        for price in [json!("12"), json!(-1)] {
            let body = json!({ "name": "a", "price": price, "description": "d" });
            let (status, err) = send(&app, json_request("POST", "/api/products", &body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(err["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_create_rejects_prices_the_table_would_round() {
        let app = test_app(None);
        for price in [json!(19.999), json!(1e10)] {
            let body = json!({ "name": "a", "price": price, "description": "d" });
            let (status, err) = send(&app, json_request("POST", "/api/products", &body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(err["error"].as_str().unwrap().contains("price"));
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let app = test_app(None);
        let mut body = sneaker();
        body["category"] = json!("pets");
        let (status, _) = send(&app, json_request("POST", "/api/products", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_json_and_not_found() {
        let app = test_app(None);
        let (_, created) = send(&app, json_request("POST", "/api/products", &sneaker())).await;
        let id = created["id"].as_str().unwrap();

        let mut change = sneaker();
        change["price"] = json!(45);
        let (status, updated) =
            send(&app, json_request("PUT", &format!("/api/products/{id}"), &change)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["price"], 45.0);

        let (status, err) =
            send(&app, json_request("PUT", "/api/products/missing", &change)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"], "Product not found");
    }

    #[tokio::test]
    async fn test_update_multipart_inlines_image() {
        let app = test_app(None);
        let (_, created) = send(&app, json_request("POST", "/api/products", &sneaker())).await;
        let id = created["id"].as_str().unwrap();

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             Jordan Mini\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"price\"\r\n\r\n\
             80\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"description\"\r\n\r\n\
             High tops\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"shoeNo\"\r\n\r\n\
             5\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             abc\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("PUT")
            .uri(format!("/api/products/{id}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, updated) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Jordan Mini");
        assert_eq!(updated["shoeSize"], "5");
        assert_eq!(updated["image"], "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let app = test_app(None);
        let (_, first) = send(&app, json_request("POST", "/api/products", &sneaker())).await;
        send(&app, json_request("POST", "/api/products", &sneaker())).await;
        let id = first["id"].as_str().unwrap();

        let (status, body) = send(&app, empty_request("DELETE", &format!("/api/products/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");
        assert_eq!(body["product"]["id"], id);

        let (status, _) = send(&app, empty_request("DELETE", &format!("/api/products/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, empty_request("DELETE", "/api/products")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], 1);
    }

    #[tokio::test]
    async fn test_contact_without_email_config() {
        let app = test_app(None);
        let body = json!({ "name": "Ana", "email": "ana@example.com", "message": "Hello" });
        let (status, record) = send(&app, json_request("POST", "/api/contact", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["name"], "Ana");
        assert!(record["id"].is_string());
        assert_eq!(record["emailStatus"]["sent"], false);
        assert!(record["emailStatus"]["error"].is_string());
    }

    #[tokio::test]
    async fn test_contact_with_email_relay() {
        let mailer = EmailService::stub("shop@babysneakers.com", "owner@babysneakers.com", true);
        let app = test_app(Some(mailer));
        let body = json!({ "name": "Ana", "email": "ana@example.com", "message": "Hello" });
        let (status, record) = send(&app, json_request("POST", "/api/contact", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["emailStatus"]["sent"], true);
        assert_eq!(record["emailStatus"]["error"], Value::Null);
    }

    #[tokio::test]
    async fn test_contact_relay_failure_is_soft() {
        let mailer = EmailService::stub("shop@babysneakers.com", "owner@babysneakers.com", false);
        let app = test_app(Some(mailer));
        let body = json!({ "name": "Ana", "email": "ana@example.com", "message": "Hello" });
        let (status, record) = send(&app, json_request("POST", "/api/contact", &body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(record["emailStatus"]["sent"], false);
    }

    #[tokio::test]
    async fn test_contact_rejects_blank_fields() {
        let app = test_app(None);
        let body = json!({ "name": "Ana", "email": "", "message": "Hello" });
        let (status, err) = send(&app, json_request("POST", "/api/contact", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_test_email() {
        let (status, err) = send(&test_app(None), empty_request("POST", "/api/test-email")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Email not configured");

        let ok = EmailService::stub("shop@babysneakers.com", "owner@babysneakers.com", true);
        let (status, body) = send(&test_app(Some(ok)), empty_request("POST", "/api/test-email")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["messageId"].is_string());

        let failing = EmailService::stub("shop@babysneakers.com", "owner@babysneakers.com", false);
        let (status, body) =
            send(&test_app(Some(failing)), empty_request("POST", "/api/test-email")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to send email");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, err) = send(&test_app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].is_string());
    }
}
