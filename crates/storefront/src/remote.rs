//! Remote catalog client.
//!
//! Talks to the catalog API over HTTP and maps responses onto the shared
//! domain types. Every call is a single attempt: no retries, no backoff.
//! Status codes map onto [`ClientError`]: 400 is a validation failure,
//! 404 a missing record, and anything else unsuccessful a network failure.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Response, StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use url::Url;

use baby_sneakers_core::{ContactMessage, ContactSubmission, Product, ProductDraft, ProductId};

use crate::error::ClientError;

/// An image file accompanying a product update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of the server's email relay for a contact message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailStatus {
    pub sent: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// A stored contact message as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    #[serde(flatten)]
    pub message: ContactMessage,
    pub email_status: EmailStatus,
}

#[derive(Debug, Deserialize)]
struct DeletedProduct {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Operations the storefront needs from the catalog service.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch every product, newest first.
    async fn list(&self) -> Result<Vec<Product>, ClientError>;

    /// Create a product; the server assigns the id.
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ClientError>;

    /// Replace a product's fields, optionally uploading a new image file.
    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
        image_file: Option<ImageFile>,
    ) -> Result<Product, ClientError>;

    /// Delete a product, returning the removed record.
    async fn delete(&self, id: &ProductId) -> Result<Product, ClientError>;

    /// Store a contact message and relay it by email.
    async fn submit_contact(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ContactReceipt, ClientError>;
}

/// HTTP implementation of [`CatalogApi`].
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the API at `api_base`.
    ///
    /// # Errors
    ///
    /// Returns error if `api_base` cannot take a path (such as a `mailto:`
    /// URL) or the HTTP client fails to build.
    pub fn new(api_base: &Url, timeout: Option<Duration>) -> Result<Self, ClientError> {
        if api_base.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "API base must be an http(s) URL: {api_base}"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: api_base.clone(),
        })
    }

    /// Append path segments to the base, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejected bases that cannot take a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn products_url(&self) -> Url {
        self.endpoint(&["api", "products"])
    }

    fn product_url(&self, id: &ProductId) -> Url {
        self.endpoint(&["api", "products", id.as_str()])
    }
}

/// Map a non-success response onto the client error taxonomy.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        other => ClientError::Network(format!("{}: {message}", other.as_u16())),
    })
}

fn update_form(draft: &ProductDraft, image_file: ImageFile) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("name", draft.name.clone())
        .text("price", draft.price.amount().to_string())
        .text("description", draft.description.clone());
    if let Some(category) = draft.category {
        form = form.text("category", category.as_str());
    }
    if let Some(shoe_size) = &draft.shoe_size {
        form = form.text("shoeSize", shoe_size.clone());
    }

    let part = Part::bytes(image_file.bytes)
        .file_name(image_file.file_name)
        .mime_str(&image_file.content_type)?;
    Ok(form.part("image", part))
}

#[async_trait]
impl CatalogApi for CatalogClient {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.client.get(self.products_url()).send().await?;
        let products: Vec<Product> = check(response).await?.json().await?;
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[tracing::instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
        let response = self
            .client
            .post(self.products_url())
            .json(draft)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self, draft, image_file), fields(id = %id))]
    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
        image_file: Option<ImageFile>,
    ) -> Result<Product, ClientError> {
        let request = self.client.put(self.product_url(id));
        let request = match image_file {
            Some(file) => request.multipart(update_form(draft, file)?),
            None => request.json(draft),
        };
        let response = request.send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ProductId) -> Result<Product, ClientError> {
        let response = self.client.delete(self.product_url(id)).send().await?;
        let deleted: DeletedProduct = check(response).await?.json().await?;
        Ok(deleted.product)
    }

    #[tracing::instrument(skip(self, submission), fields(email = %submission.email))]
    async fn submit_contact(
        &self,
        submission: &ContactSubmission,
    ) -> Result<ContactReceipt, ClientError> {
        let response = self
            .client
            .post(self.endpoint(&["api", "contact"]))
            .json(submission)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baby_sneakers_core::Price;

    use super::*;

    #[test]
    fn test_urls_ignore_trailing_slash() {
        let client = CatalogClient::new(&Url::parse("http://localhost:5177/").unwrap(), None).unwrap();
        assert_eq!(client.products_url().as_str(), "http://localhost:5177/api/products");
        assert_eq!(
            client.product_url(&ProductId::new("abc")).as_str(),
            "http://localhost:5177/api/products/abc"
        );
    }

    #[test]
    fn test_product_ids_are_percent_encoded() {
        let base = Url::parse("http://localhost:5177/shop/").unwrap();
        let client = CatalogClient::new(&base, None).unwrap();
        assert_eq!(
            client.product_url(&ProductId::new("a/b?c")).as_str(),
            "http://localhost:5177/shop/api/products/a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_rejects_base_without_path() {
        let base = Url::parse("mailto:shop@example.com").unwrap();
        assert!(matches!(
            CatalogClient::new(&base, None),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_contact_receipt_parses_flattened_record() {
        let json = r#"{
            "_id": "c1",
            "name": "Ana",
            "email": "ana@example.com",
            "message": "Hi",
            "createdAt": "2026-10-18T12:00:00Z",
            "updatedAt": "2026-10-18T12:00:00Z",
            "emailStatus": { "sent": false, "error": "Email not configured - check server logs" }
        }"#;
        let receipt: ContactReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.message.id.as_str(), "c1");
        assert!(!receipt.email_status.sent);
    }

    #[test]
    fn test_update_form_builds_with_image() {
        let draft = ProductDraft {
            name: "Mini".to_string(),
            price: Price::from_cents(1000),
            description: "d".to_string(),
            image: None,
            category: None,
            shoe_size: Some("3".to_string()),
        };
        let file = ImageFile {
            file_name: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(update_form(&draft, file).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let client = CatalogClient::new(
            &Url::parse("http://127.0.0.1:9").unwrap(),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
