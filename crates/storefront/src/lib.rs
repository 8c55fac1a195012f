//! Baby Sneakers Storefront library.
//!
//! Client-side state for the storefront: the catalog, the cart, the local
//! session, and the theme, kept in sync with the catalog API and persisted
//! to a local key-value store.
//!
//! [`Storefront`] owns every container. Each of its operations changes one
//! container and then writes that container back to storage, so a process
//! restarted from the same state file picks up where it left off.
//!
//! # Modules
//!
//! - [`remote`] - HTTP client for the catalog API
//! - [`catalog`] - Product list, search, filtering, and remote reconciliation
//! - [`cart`] - Cart lines and totals
//! - [`auth`] - Local accounts and the admin gate
//! - [`storage`] - Persistent key-value store
//! - [`checkout`] - Hand-off to a hosted payment page
//! - [`image`] - Image downscaling for product uploads
//! - [`assistant`] - Rule-based shopping assistant

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod assistant;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod image;
pub mod remote;
pub mod storage;
pub mod theme;

use std::sync::Arc;

use baby_sneakers_core::{ContactSubmission, Product, ProductDraft, ProductId, ValidationError};

use crate::assistant::Conversation;
use crate::auth::{Auth, AuthState, RegisteredUser};
use crate::cart::{Cart, CartSnapshot};
use crate::catalog::{Catalog, CatalogSnapshot, ImageMap, Mutation, PersistedCatalog, ProductFilter};
use crate::checkout::{CheckoutDetails, CheckoutOutcome};
use crate::config::StorefrontConfig;
use crate::error::{ClientError, StartupError};
use crate::remote::{CatalogApi, CatalogClient, ContactReceipt, ImageFile};
use crate::storage::{FileStore, Storage, keys};
use crate::theme::Theme;

/// Result of a contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The API stored the message.
    Delivered(ContactReceipt),
    /// The API was unreachable; the message waits in `pendingContacts`.
    Queued,
}

/// The storefront composition root.
pub struct Storefront {
    config: StorefrontConfig,
    api: Arc<dyn CatalogApi>,
    storage: Storage,
    catalog: Catalog,
    cart: Cart,
    auth: Auth,
    theme: Theme,
    pending_contacts: Vec<ContactSubmission>,
    conversation: Conversation,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("api_base", &self.config.api_base.as_str())
            .field("products", &self.catalog.products().len())
            .field("cart_items", &self.cart.item_count())
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Build from configuration: an HTTP client for `api_base` and a file
    /// store when `state_file` is set, in-memory storage otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if the HTTP client cannot be built or the
    /// state file cannot be opened.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StartupError> {
        let client = CatalogClient::new(&config.api_base, config.http_timeout)?;
        let storage = match &config.state_file {
            Some(path) => Storage::new(FileStore::open(path)?),
            None => {
                tracing::info!("No state file configured; state will not survive restarts");
                Storage::in_memory()
            }
        };
        Ok(Self::new(config, Arc::new(client), storage))
    }

    /// Load configuration from the environment and build.
    ///
    /// # Errors
    ///
    /// Returns `StartupError` if configuration is invalid or startup fails.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_config(StorefrontConfig::from_env()?)
    }

    /// Assemble from explicit parts, restoring persisted state from `storage`.
    #[must_use]
    pub fn new(config: StorefrontConfig, api: Arc<dyn CatalogApi>, storage: Storage) -> Self {
        let mut catalog = Catalog::new();
        let persisted: PersistedCatalog = storage.load(keys::PRODUCTS);
        let images: ImageMap = storage.load(keys::PRODUCT_IMAGES);
        catalog.restore(CatalogSnapshot::from_persisted(persisted, &images));

        let mut cart = Cart::new();
        cart.restore(storage.load::<CartSnapshot>(keys::CART));

        let mut auth = Auth::new(config.admin_passphrase_hash.clone());
        auth.restore(
            storage.load::<AuthState>(keys::AUTH),
            storage.load::<Vec<RegisteredUser>>(keys::USERS),
        );

        let theme: Theme = storage.load(keys::THEME);
        let pending_contacts: Vec<ContactSubmission> = storage.load(keys::PENDING_CONTACTS);

        tracing::debug!(
            products = catalog.products().len(),
            cart_items = cart.item_count(),
            pending_contacts = pending_contacts.len(),
            "Restored storefront state"
        );

        Self {
            config,
            api,
            storage,
            catalog,
            cart,
            auth,
            theme,
            pending_contacts,
            conversation: Conversation::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn auth(&self) -> &Auth {
        &self.auth
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Contact messages waiting to be resent.
    #[must_use]
    pub fn pending_contacts(&self) -> &[ContactSubmission] {
        &self.pending_contacts
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_catalog(&mut self) {
        let (persisted, images) = self.catalog.snapshot().into_persisted();
        self.storage.save(keys::PRODUCTS, &persisted);
        self.storage.save(keys::PRODUCT_IMAGES, &images);
    }

    fn persist_cart(&mut self) {
        self.storage.save(keys::CART, &self.cart.snapshot());
    }

    fn persist_auth(&mut self) {
        self.storage.save(keys::AUTH, self.auth.state());
        self.storage.save(keys::USERS, self.auth.users());
    }

    fn persist_pending_contacts(&mut self) {
        self.storage.save(keys::PENDING_CONTACTS, &self.pending_contacts);
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Products matching the current search query.
    #[must_use]
    pub fn search_results(&self) -> Vec<&Product> {
        self.catalog.filtered(&self.catalog.search_filter())
    }

    /// Products matching `filter`.
    #[must_use]
    pub fn filter_products(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.catalog.filtered(filter)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.catalog.set_search_query(query);
        self.persist_catalog();
    }

    /// Replace the local catalog with the API's.
    ///
    /// # Errors
    ///
    /// Returns the client error when the API is unavailable; the local
    /// catalog is kept.
    pub async fn refresh_products(&mut self) -> Result<(), ClientError> {
        let result = self.catalog.refresh(self.api.as_ref()).await;
        if result.is_ok() {
            self.persist_catalog();
        }
        result
    }

    /// Create a product. See [`Catalog::create`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the draft is rejected.
    pub async fn create_product(
        &mut self,
        draft: ProductDraft,
    ) -> Result<Mutation<Product>, ClientError> {
        let outcome = self.catalog.create(self.api.as_ref(), draft).await?;
        self.persist_catalog();
        Ok(outcome)
    }

    /// Update a product. See [`Catalog::update`].
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when the draft is rejected.
    pub async fn update_product(
        &mut self,
        id: &ProductId,
        draft: ProductDraft,
        image_file: Option<ImageFile>,
    ) -> Result<Mutation<Product>, ClientError> {
        let outcome = self
            .catalog
            .update(self.api.as_ref(), id, draft, image_file)
            .await?;
        self.persist_catalog();
        Ok(outcome)
    }

    /// Delete a product. See [`Catalog::delete`].
    ///
    /// # Errors
    ///
    /// Returns the client error when neither the API nor the local catalog
    /// has the product.
    pub async fn delete_product(&mut self, id: &ProductId) -> Result<Mutation<Product>, ClientError> {
        let outcome = self.catalog.delete(self.api.as_ref(), id).await?;
        self.persist_catalog();
        Ok(outcome)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub const fn open_cart(&mut self) {
        self.cart.open();
    }

    pub const fn close_cart(&mut self) {
        self.cart.close();
    }

    /// Add one unit of a catalog product to the cart.
    ///
    /// Returns `false` when the id is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> bool {
        let Some(product) = self.catalog.get(id) else {
            return false;
        };
        self.cart.add(product);
        self.persist_cart();
        true
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove(id);
        self.persist_cart();
    }

    pub fn increment_quantity(&mut self, id: &ProductId) {
        self.cart.increment(id);
        self.persist_cart();
    }

    pub fn decrement_quantity(&mut self, id: &ProductId) {
        self.cart.decrement(id);
        self.persist_cart();
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    /// Hand the cart off to payment. See [`checkout::checkout`].
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the cart is empty or a field is blank.
    pub fn checkout(&mut self, details: &CheckoutDetails) -> Result<CheckoutOutcome, ValidationError> {
        let outcome = checkout::checkout(&mut self.cart, details, self.config.payment_link.as_ref())?;
        self.persist_cart();
        Ok(outcome)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    pub fn login_admin(&mut self, passphrase: &str) -> bool {
        let granted = self.auth.login_admin(passphrase);
        self.persist_auth();
        granted
    }

    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let ok = self.auth.login(email, password);
        self.persist_auth();
        ok
    }

    pub fn signup(&mut self, email: &str, password: &str) -> bool {
        let ok = self.auth.signup(email, password);
        self.persist_auth();
        ok
    }

    pub fn logout(&mut self) {
        self.auth.logout();
        self.persist_auth();
    }

    pub fn set_auth_error(&mut self, message: impl Into<String>) {
        self.auth.set_error(message);
        self.persist_auth();
    }

    pub fn clear_auth_error(&mut self) {
        self.auth.clear_error();
        self.persist_auth();
    }

    // =========================================================================
    // Theme
    // =========================================================================

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle();
        self.storage.save(keys::THEME, &self.theme);
        self.theme
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Send a contact message.
    ///
    /// The submission is validated locally first. When the API is
    /// unreachable the message is queued under `pendingContacts`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` for blank fields or a malformed
    /// email, and any non-network API failure.
    pub async fn submit_contact(
        &mut self,
        submission: ContactSubmission,
    ) -> Result<ContactOutcome, ClientError> {
        submission.validate()?;

        match self.api.submit_contact(&submission).await {
            Ok(receipt) => {
                if !receipt.email_status.sent {
                    tracing::warn!(
                        error = receipt.email_status.error.as_deref().unwrap_or_default(),
                        "Contact stored but email relay failed"
                    );
                }
                Ok(ContactOutcome::Delivered(receipt))
            }
            Err(e @ ClientError::Network(_)) => {
                tracing::warn!(error = %e, "API unavailable; contact message queued");
                self.pending_contacts.push(submission);
                self.persist_pending_contacts();
                Ok(ContactOutcome::Queued)
            }
            Err(e) => Err(e),
        }
    }

    /// Try to send every queued contact message once.
    ///
    /// Messages that fail with a network error stay queued; messages the
    /// API rejects are dropped. Returns how many were delivered.
    pub async fn resend_pending_contacts(&mut self) -> usize {
        let queued = std::mem::take(&mut self.pending_contacts);
        let mut delivered = 0;

        for submission in queued {
            match self.api.submit_contact(&submission).await {
                Ok(_) => delivered += 1,
                Err(ClientError::Network(_)) => self.pending_contacts.push(submission),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping queued contact message rejected by the API");
                }
            }
        }

        self.persist_pending_contacts();
        delivered
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    /// Ask the shopping assistant, with the loaded catalog as context.
    pub fn ask_assistant(&mut self, message: &str) -> String {
        self.conversation
            .send(message, self.catalog.products())
            .to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::{Path, PathBuf};

    use baby_sneakers_core::Price;
    use url::Url;

    use super::*;
    use crate::catalog::tests::{FakeApi, draft};
    use crate::storage::MemoryStore;

    fn config() -> StorefrontConfig {
        StorefrontConfig::for_api(Url::parse("http://localhost:5177").unwrap())
    }

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("baby_sneakers_storefront_{}.json", uuid::Uuid::new_v4()))
    }

    fn open(path: &Path, api: Arc<FakeApi>) -> Storefront {
        Storefront::new(config(), api, Storage::new(FileStore::open(path).unwrap()))
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let path = temp_path();
        let api = Arc::new(FakeApi::default());

        let (products, cart) = {
            let mut storefront = open(&path, Arc::clone(&api));
            let mut with_image = draft("Tiny Runner", 3999);
            with_image.image = Some("data:image/jpeg;base64,AAAA".to_string());
            let created = storefront.create_product(with_image).await.unwrap().into_record();
            storefront.create_product(draft("Crib Walker", 2000)).await.unwrap();
            storefront.set_search_query("tiny");
            storefront.add_to_cart(&created.id);
            storefront.add_to_cart(&created.id);
            storefront.open_cart();
            storefront.toggle_theme();
            assert!(storefront.signup("mom@example.com", "secret"));
            (storefront.catalog().snapshot(), storefront.cart().snapshot())
        };

        let restored = open(&path, api);
        assert_eq!(restored.catalog().snapshot(), products);
        assert_eq!(restored.cart().snapshot(), cart);
        assert!(!restored.cart().is_open());
        assert_eq!(restored.theme(), Theme::Light);
        assert!(restored.auth().is_authenticated());
        assert_eq!(restored.auth().users().len(), 1);
        assert_eq!(restored.search_results().len(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupted_entries_yield_defaults() {
        let store = MemoryStore::with_entries([
            (keys::PRODUCTS, "{{{"),
            (keys::CART, "[1, 2]"),
            (keys::THEME, "\"sepia\""),
            (keys::AUTH, "null"),
        ]);
        let storefront = Storefront::new(config(), Arc::new(FakeApi::default()), Storage::new(store));
        assert!(storefront.catalog().products().is_empty());
        assert!(storefront.cart().is_empty());
        assert_eq!(storefront.theme(), Theme::Dark);
        assert!(!storefront.auth().is_authenticated());
    }

    #[tokio::test]
    async fn test_offline_create_is_persisted() {
        let path = temp_path();
        let api = Arc::new(FakeApi::offline());
        {
            let mut storefront = open(&path, Arc::clone(&api));
            let outcome = storefront.create_product(draft("Offline", 100)).await.unwrap();
            assert!(!outcome.is_synced());
        }
        let restored = open(&path, Arc::clone(&api));
        assert_eq!(restored.catalog().products().len(), 1);
        assert!(restored.catalog().products()[0].id.is_local());
        assert_eq!(api.call_count("create"), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_add_to_cart_requires_catalog_product() {
        let mut storefront = Storefront::new(config(), Arc::new(FakeApi::default()), Storage::in_memory());
        assert!(!storefront.add_to_cart(&ProductId::new("missing")));
        assert!(storefront.cart().is_empty());
    }

    #[tokio::test]
    async fn test_simulated_checkout_clears_persisted_cart() {
        let mut storefront = Storefront::new(config(), Arc::new(FakeApi::default()), Storage::in_memory());
        let product = storefront.create_product(draft("Runner", 1250)).await.unwrap().into_record();
        storefront.add_to_cart(&product.id);

        let outcome = storefront
            .checkout(&CheckoutDetails {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                address: "1 Main St".to_string(),
            })
            .unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Simulated {
                total: Price::from_cents(1250)
            }
        );
        assert!(storefront.cart().is_empty());
    }

    #[tokio::test]
    async fn test_contact_queued_when_offline() {
        let mut storefront = Storefront::new(config(), Arc::new(FakeApi::offline()), Storage::in_memory());
        let submission = ContactSubmission {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            message: "Do you ship to Canada?".to_string(),
        };

        let outcome = storefront.submit_contact(submission.clone()).await.unwrap();
        assert_eq!(outcome, ContactOutcome::Queued);
        assert_eq!(storefront.pending_contacts(), [submission]);

        assert_eq!(storefront.resend_pending_contacts().await, 0);
        assert_eq!(storefront.pending_contacts().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_validated_locally() {
        let api = Arc::new(FakeApi::default());
        let mut storefront = Storefront::new(config(), Arc::clone(&api) as Arc<dyn CatalogApi>, Storage::in_memory());
        let err = storefront
            .submit_contact(ContactSubmission::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(api.call_count("contact"), 0);
    }

    #[test]
    fn test_assistant_sees_catalog() {
        let mut storefront = Storefront::new(config(), Arc::new(FakeApi::default()), Storage::in_memory());
        let reply = storefront.ask_assistant("hello");
        assert!(reply.contains("Welcome"));
    }
}
