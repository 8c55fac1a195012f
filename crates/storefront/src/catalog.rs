//! Catalog state: the product list, the search query, and the rules that
//! reconcile local changes with the catalog API.
//!
//! Remote-backed mutations follow one contract:
//!
//! - On success the whole list is re-fetched and replaces local state. If
//!   that follow-up fetch fails, the confirmed record is applied locally and
//!   the result is still [`Mutation::Synced`].
//! - On a network failure (or a missing remote record for update/delete) the
//!   change is applied locally and [`Mutation::LocalOnly`] is returned. The
//!   change is never retried.
//! - A validation failure is returned as-is and local state is untouched.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use baby_sneakers_core::{Category, Price, Product, ProductDraft, ProductId};

use crate::error::ClientError;
use crate::remote::{CatalogApi, ImageFile};

/// Outcome of a remote-backed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// The API accepted the change.
    Synced(T),
    /// The API was unavailable; the change exists only locally.
    LocalOnly(T),
}

impl<T> Mutation<T> {
    /// The affected record.
    pub const fn record(&self) -> &T {
        match self {
            Self::Synced(record) | Self::LocalOnly(record) => record,
        }
    }

    /// Consume the outcome, returning the affected record.
    pub fn into_record(self) -> T {
        match self {
            Self::Synced(record) | Self::LocalOnly(record) => record,
        }
    }

    /// Whether the API accepted the change.
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }
}

/// Criteria for narrowing the product list.
///
/// Every criterion is optional; blank text matches everything. Price bounds
/// are kept as entered and parsed on use, so a half-typed bound such as
/// `"abc"` simply does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name.
    pub name: String,
    /// Inclusive lower price bound.
    pub min_price: String,
    /// Inclusive upper price bound.
    pub max_price: String,
    /// Substring of the shoe size.
    pub shoe_size: String,
}

impl ProductFilter {
    /// A filter on name only.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether `product` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let name = self.name.trim().to_lowercase();
        let shoe_size = self.shoe_size.trim();

        self.category.is_none_or(|c| product.category == Some(c))
            && (name.is_empty() || product.name.to_lowercase().contains(&name))
            && parse_bound(&self.min_price).is_none_or(|min| product.price.amount() >= min)
            && parse_bound(&self.max_price).is_none_or(|max| product.price.amount() <= max)
            && (shoe_size.is_empty()
                || product
                    .shoe_size
                    .as_deref()
                    .is_some_and(|size| size.contains(shoe_size)))
    }
}

fn parse_bound(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Serializable copy of the catalog state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    #[serde(default)]
    pub search_query: String,
}

/// Catalog snapshot as persisted: products without images, leniently typed so
/// one bad record does not discard the rest.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCatalog {
    #[serde(default)]
    pub products: Vec<serde_json::Value>,
    #[serde(default)]
    pub search_query: String,
}

/// Product id to image, persisted separately from the product list.
pub type ImageMap = BTreeMap<ProductId, String>;

impl CatalogSnapshot {
    /// Split into the persisted list (images stripped) and the image map.
    #[must_use]
    pub fn into_persisted(self) -> (PersistedCatalog, ImageMap) {
        let mut images = ImageMap::new();
        let products = self
            .products
            .into_iter()
            .filter_map(|mut product| {
                if let Some(image) = product.image.take() {
                    images.insert(product.id.clone(), image);
                }
                serde_json::to_value(product).ok()
            })
            .collect();

        (
            PersistedCatalog {
                products,
                search_query: self.search_query,
            },
            images,
        )
    }

    /// Rebuild from persisted parts.
    ///
    /// Records without an id, with an empty name, or with a non-numeric
    /// price are dropped. Images are restored from `images`, falling back to
    /// any image still embedded in the record.
    #[must_use]
    pub fn from_persisted(persisted: PersistedCatalog, images: &ImageMap) -> Self {
        let products = persisted
            .products
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Product>(value) {
                Ok(product) if !product.name.trim().is_empty() => Some(product),
                Ok(_) => {
                    tracing::warn!("Dropping persisted product with an empty name");
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed persisted product");
                    None
                }
            })
            .map(|mut product| {
                if let Some(image) = images.get(&product.id) {
                    product.image = Some(image.clone());
                }
                product
            })
            .collect();

        Self {
            products,
            search_query: persisted.search_query,
        }
    }
}

/// The in-memory catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    search_query: String,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Products in list order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Products matching `filter`, in list order.
    #[must_use]
    pub fn filtered(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Filter seeded from the current search query.
    #[must_use]
    pub fn search_filter(&self) -> ProductFilter {
        ProductFilter::by_name(self.search_query.clone())
    }

    // =========================================================================
    // Local operations
    // =========================================================================

    /// Replace the whole list. Later duplicates of an id are dropped.
    pub fn set_products(&mut self, products: Vec<Product>) {
        let mut unique: Vec<Product> = Vec::with_capacity(products.len());
        for product in products {
            if !unique.iter().any(|p| p.id == product.id) {
                unique.push(product);
            }
        }
        self.products = unique;
    }

    /// Append a product unless its id is already present.
    ///
    /// Returns whether the product was added.
    pub fn add_product(&mut self, product: Product) -> bool {
        if self.get(&product.id).is_some() {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Replace the product with the same id. No-op when the id is absent.
    ///
    /// Returns whether a product was replaced.
    pub fn edit_product(&mut self, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product;
                true
            }
            None => false,
        }
    }

    /// Remove a product by id, returning it if present.
    pub fn delete_product(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.products.clone(),
            search_query: self.search_query.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: CatalogSnapshot) {
        self.set_products(snapshot.products);
        self.search_query = snapshot.search_query;
    }

    /// Time-based id for a record created while offline, unique in the list.
    fn next_local_id(&self) -> ProductId {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let id = ProductId::local(millis);
            if self.get(&id).is_none() {
                return id;
            }
            millis += 1;
        }
    }

    // =========================================================================
    // Remote-backed operations
    // =========================================================================

    /// Replace the list with the API's.
    ///
    /// # Errors
    ///
    /// Returns the client error when the fetch fails; the local list is kept.
    pub async fn refresh(&mut self, api: &dyn CatalogApi) -> Result<(), ClientError> {
        match api.list().await {
            Ok(products) => {
                self.set_products(products);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog refresh failed; keeping local products");
                Err(e)
            }
        }
    }

    /// Re-fetch after a confirmed mutation; on failure, apply `confirmed`.
    async fn reconcile(&mut self, api: &dyn CatalogApi, confirmed: &Product) {
        if self.refresh(api).await.is_err() && !self.edit_product(confirmed.clone()) {
            self.add_product(confirmed.clone());
        }
    }

    /// Create a product through the API, falling back to a local record.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the draft is rejected locally
    /// or by the API; local state is untouched.
    pub async fn create(
        &mut self,
        api: &dyn CatalogApi,
        draft: ProductDraft,
    ) -> Result<Mutation<Product>, ClientError> {
        let draft = draft.normalized();
        draft.validate()?;

        match api.create(&draft).await {
            Ok(product) => {
                tracing::info!(id = %product.id, "Product created");
                self.reconcile(api, &product).await;
                Ok(Mutation::Synced(product))
            }
            Err(e @ ClientError::Network(_)) => {
                let now = Utc::now();
                let mut product = Product::from_draft(self.next_local_id(), draft);
                product.created_at = Some(now);
                product.updated_at = Some(now);
                tracing::warn!(id = %product.id, error = %e, "API unavailable; product created locally");
                self.add_product(product.clone());
                Ok(Mutation::LocalOnly(product))
            }
            Err(e) => Err(e),
        }
    }

    /// Update a product through the API, falling back to a local edit.
    ///
    /// A draft without an image keeps the current image.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the draft is rejected, and the
    /// client error when the API call fails and the product is not present
    /// locally either.
    pub async fn update(
        &mut self,
        api: &dyn CatalogApi,
        id: &ProductId,
        draft: ProductDraft,
        image_file: Option<ImageFile>,
    ) -> Result<Mutation<Product>, ClientError> {
        let mut draft = draft.normalized();
        draft.validate()?;

        match api.update(id, &draft, image_file).await {
            Ok(product) => {
                tracing::info!(id = %product.id, "Product updated");
                self.reconcile(api, &product).await;
                Ok(Mutation::Synced(product))
            }
            Err(e) if e.allows_local_fallback() => {
                let Some(existing) = self.get(id) else {
                    return Err(e);
                };
                if draft.image.is_none() {
                    draft.image.clone_from(&existing.image);
                }
                let created_at = existing.created_at;
                let mut product = Product::from_draft(id.clone(), draft);
                product.created_at = created_at;
                product.updated_at = Some(Utc::now());
                tracing::warn!(id = %id, error = %e, "API update failed; product updated locally");
                self.edit_product(product.clone());
                Ok(Mutation::LocalOnly(product))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a product through the API, falling back to a local removal.
    ///
    /// # Errors
    ///
    /// Returns the client error when the API call fails and the product is
    /// not present locally either.
    pub async fn delete(
        &mut self,
        api: &dyn CatalogApi,
        id: &ProductId,
    ) -> Result<Mutation<Product>, ClientError> {
        match api.delete(id).await {
            Ok(product) => {
                tracing::info!(id = %id, "Product deleted");
                if self.refresh(api).await.is_err() {
                    self.delete_product(id);
                }
                Ok(Mutation::Synced(product))
            }
            Err(e) if e.allows_local_fallback() => match self.delete_product(id) {
                Some(product) => {
                    tracing::warn!(id = %id, error = %e, "API delete failed; product removed locally");
                    Ok(Mutation::LocalOnly(product))
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}

/// Lowest and highest price in a product list.
#[must_use]
pub fn price_range(products: &[Product]) -> Option<(Price, Price)> {
    let min = products.iter().map(|p| p.price).min()?;
    let max = products.iter().map(|p| p.price).max()?;
    Some((min, max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use baby_sneakers_core::ContactSubmission;

    use super::*;
    use crate::remote::ContactReceipt;

    /// In-process catalog API with switchable failure modes.
    #[derive(Default)]
    pub struct FakeApi {
        pub products: Mutex<Vec<Product>>,
        pub offline: bool,
        pub list_fails: bool,
        pub calls: Mutex<Vec<&'static str>>,
        next_id: Mutex<u32>,
    }

    impl FakeApi {
        pub fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn record(&self, call: &'static str) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            if self.offline {
                Err(ClientError::Network("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        pub fn call_count(&self, call: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| **c == call).count()
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            self.record("list")?;
            if self.list_fails {
                return Err(ClientError::Network("list failed".to_string()));
            }
            Ok(self.products.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn create(&self, draft: &ProductDraft) -> Result<Product, ClientError> {
            self.record("create")?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let product = Product::from_draft(ProductId::new(format!("srv-{next}")), draft.clone());
            self.products.lock().unwrap().push(product.clone());
            Ok(product)
        }

        async fn update(
            &self,
            id: &ProductId,
            draft: &ProductDraft,
            _image_file: Option<ImageFile>,
        ) -> Result<Product, ClientError> {
            self.record("update")?;
            let mut products = self.products.lock().unwrap();
            let existing = products
                .iter_mut()
                .find(|p| &p.id == id)
                .ok_or_else(|| ClientError::NotFound("Product not found".to_string()))?;
            *existing = Product::from_draft(id.clone(), draft.clone());
            Ok(existing.clone())
        }

        async fn delete(&self, id: &ProductId) -> Result<Product, ClientError> {
            self.record("delete")?;
            let mut products = self.products.lock().unwrap();
            let index = products
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| ClientError::NotFound("Product not found".to_string()))?;
            Ok(products.remove(index))
        }

        async fn submit_contact(
            &self,
            _submission: &ContactSubmission,
        ) -> Result<ContactReceipt, ClientError> {
            self.record("contact")?;
            Err(ClientError::Network("not supported by fake".to_string()))
        }
    }

    pub fn draft(name: &str, cents: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: Price::from_cents(cents),
            description: format!("{name} description"),
            image: None,
            category: Some(Category::Kids),
            shoe_size: Some("4".to_string()),
        }
    }

    fn product(id: &str, name: &str, cents: u32) -> Product {
        Product::from_draft(ProductId::new(id), draft(name, cents))
    }

    #[test]
    fn test_add_product_is_idempotent() {
        let mut catalog = Catalog::new();
        assert!(catalog.add_product(product("a", "Runner", 1000)));
        assert!(!catalog.add_product(product("a", "Other", 2000)));
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].name, "Runner");
    }

    #[test]
    fn test_edit_absent_id_is_noop() {
        let mut catalog = Catalog::new();
        catalog.add_product(product("a", "Runner", 1000));
        assert!(!catalog.edit_product(product("zzz", "Ghost", 1)));
        assert_eq!(catalog.products().len(), 1);
    }

    #[test]
    fn test_set_products_drops_duplicate_ids() {
        let mut catalog = Catalog::new();
        catalog.set_products(vec![
            product("a", "First", 1000),
            product("a", "Dup", 1000),
            product("b", "Second", 1000),
        ]);
        let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn test_filter_includes_product_matching_its_own_attributes() {
        let p = product("a", "Jordan Mini High", 4550);
        let filter = ProductFilter {
            category: Some(Category::Kids),
            name: "mini".to_string(),
            min_price: "45.50".to_string(),
            max_price: "45.5".to_string(),
            shoe_size: "4".to_string(),
        };
        assert!(filter.matches(&p));
    }

    #[test]
    fn test_filter_criteria_exclude() {
        let p = product("a", "Jordan Mini", 4550);
        let wrong_category = ProductFilter {
            category: Some(Category::Men),
            ..ProductFilter::default()
        };
        assert!(!wrong_category.matches(&p));

        let too_cheap = ProductFilter {
            max_price: "10".to_string(),
            ..ProductFilter::default()
        };
        assert!(!too_cheap.matches(&p));

        let other_size = ProductFilter {
            shoe_size: "9".to_string(),
            ..ProductFilter::default()
        };
        assert!(!other_size.matches(&p));
    }

    #[test]
    fn test_unparseable_and_blank_bounds_match_everything() {
        let p = product("a", "Runner", 1000);
        let filter = ProductFilter {
            name: "   ".to_string(),
            min_price: "abc".to_string(),
            max_price: String::new(),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&p));
    }

    #[test]
    fn test_search_query_seeds_name_filter() {
        let mut catalog = Catalog::new();
        catalog.add_product(product("a", "Nike Tiny", 1000));
        catalog.add_product(product("b", "Puma Baby", 1000));
        catalog.set_search_query("nike");

        let visible = catalog.filtered(&catalog.search_filter());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "a");
    }

    #[test]
    fn test_persisted_round_trip_restores_images() {
        let mut catalog = Catalog::new();
        let mut with_image = product("a", "Runner", 1000);
        with_image.image = Some("data:image/jpeg;base64,AAAA".to_string());
        catalog.add_product(with_image);
        catalog.add_product(product("b", "Walker", 2000));
        catalog.set_search_query("run");

        let (persisted, images) = catalog.snapshot().into_persisted();
        assert!(persisted.products.iter().all(|p| p.get("image").is_none()));
        assert_eq!(images.len(), 1);

        let json = serde_json::to_string(&persisted).unwrap();
        let reloaded: PersistedCatalog = serde_json::from_str(&json).unwrap();
        let snapshot = CatalogSnapshot::from_persisted(reloaded, &images);
        assert_eq!(snapshot, catalog.snapshot());
    }

    #[test]
    fn test_from_persisted_drops_invalid_records() {
        let persisted: PersistedCatalog = serde_json::from_str(
            r#"{
                "products": [
                    {"id": "ok", "name": "Runner", "price": 10, "description": "d"},
                    {"name": "No id", "price": 10},
                    {"id": "blank", "name": "", "price": 10},
                    {"id": "str", "name": "Str price", "price": "10"}
                ],
                "searchQuery": "x"
            }"#,
        )
        .unwrap();
        let snapshot = CatalogSnapshot::from_persisted(persisted, &ImageMap::new());
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.products[0].id.as_str(), "ok");
        assert_eq!(snapshot.search_query, "x");
    }

    #[tokio::test]
    async fn test_create_then_list_has_exactly_one_match() {
        let api = FakeApi::default();
        let mut catalog = Catalog::new();
        let submitted = draft("Tiny Runner", 3999);

        let outcome = catalog.create(&api, submitted.clone()).await.unwrap();
        assert!(outcome.is_synced());

        let listed = api.list().await.unwrap();
        assert_eq!(listed.iter().filter(|p| p.matches_draft(&submitted)).count(), 1);
        assert_eq!(catalog.products(), listed.as_slice());
    }

    #[tokio::test]
    async fn test_offline_create_makes_local_record_without_retry() {
        let api = FakeApi::offline();
        let mut catalog = Catalog::new();

        let outcome = catalog.create(&api, draft("Tiny Runner", 3999)).await.unwrap();
        let Mutation::LocalOnly(product) = outcome else {
            panic!("expected a local-only record");
        };
        assert!(product.id.is_local());
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(api.call_count("create"), 1);
    }

    #[tokio::test]
    async fn test_offline_creates_get_distinct_ids() {
        let api = FakeApi::offline();
        let mut catalog = Catalog::new();
        let first = catalog.create(&api, draft("A", 100)).await.unwrap().into_record();
        let second = catalog.create(&api, draft("B", 100)).await.unwrap().into_record();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_invalid_create_leaves_state_untouched() {
        let api = FakeApi::default();
        let mut catalog = Catalog::new();
        let mut bad = draft("x", 100);
        bad.name = "  ".to_string();

        let err = catalog.create(&api, bad).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(catalog.products().is_empty());
        assert_eq!(api.call_count("create"), 0);
    }

    #[tokio::test]
    async fn test_reconcile_failure_still_synced() {
        let api = FakeApi {
            list_fails: true,
            ..FakeApi::default()
        };
        let mut catalog = Catalog::new();
        let outcome = catalog.create(&api, draft("Runner", 100)).await.unwrap();
        assert!(outcome.is_synced());
        assert_eq!(catalog.products().len(), 1);
        assert_eq!(catalog.products()[0].id, outcome.record().id);
    }

    #[tokio::test]
    async fn test_update_not_found_falls_back_locally() {
        let api = FakeApi::default();
        let mut catalog = Catalog::new();
        let mut local = product("local-1", "Runner", 1000);
        local.image = Some("https://img.example/a.jpg".to_string());
        catalog.add_product(local);

        let outcome = catalog
            .update(&api, &ProductId::new("local-1"), draft("Renamed", 1500), None)
            .await
            .unwrap();

        assert!(!outcome.is_synced());
        let stored = catalog.get(&ProductId::new("local-1")).unwrap();
        assert_eq!(stored.name, "Renamed");
        assert_eq!(stored.image.as_deref(), Some("https://img.example/a.jpg"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_reports_remote_error() {
        let api = FakeApi::default();
        let mut catalog = Catalog::new();

        let err = catalog
            .update(&api, &ProductId::new("ghost"), draft("Ghost", 100), None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::NotFound(_)));
        assert!(catalog.products().is_empty());

        let offline = FakeApi::offline();
        let err = catalog
            .update(&offline, &ProductId::new("ghost"), draft("Ghost", 100), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_delete_synced_and_local() {
        let api = FakeApi::default();
        let mut catalog = Catalog::new();
        let created = catalog.create(&api, draft("A", 100)).await.unwrap().into_record();
        catalog.add_product(product("local-9", "Offline", 100));

        let outcome = catalog.delete(&api, &created.id).await.unwrap();
        assert!(outcome.is_synced());
        // The refresh replaced the list with the server's, which never had local-9.
        assert!(catalog.products().is_empty());

        catalog.add_product(product("local-9", "Offline", 100));
        let outcome = catalog.delete(&api, &ProductId::new("local-9")).await.unwrap();
        assert!(!outcome.is_synced());
        assert!(catalog.products().is_empty());

        let err = catalog.delete(&api, &ProductId::new("nowhere")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_local_list() {
        let api = FakeApi::offline();
        let mut catalog = Catalog::new();
        catalog.add_product(product("a", "Runner", 1000));

        assert!(catalog.refresh(&api).await.is_err());
        assert_eq!(catalog.products().len(), 1);
    }

    #[test]
    fn test_price_range() {
        assert!(price_range(&[]).is_none());
        let products = [product("a", "A", 2500), product("b", "B", 999)];
        assert_eq!(
            price_range(&products),
            Some((Price::from_cents(999), Price::from_cents(2500)))
        );
    }
}
