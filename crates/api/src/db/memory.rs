//! In-process repositories.
//!
//! Used by the router tests, the integration tests, and local runs without
//! `API_DATABASE_URL`. Data lives only as long as the process.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use baby_sneakers_core::{ContactId, ContactMessage, Email, Product, ProductDraft, ProductId};

use super::{ContactRepository, ProductRepository, RepositoryError, new_id};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a half-written Vec behind.
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Product repository held in memory, insertion order preserved.
#[derive(Clone, Default)]
pub struct MemoryProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
}

impl MemoryProductRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = lock(&self.products);
        Ok(products.iter().rev().cloned().collect())
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let mut product = Product::from_draft(ProductId::new(new_id()), draft.clone());
        product.created_at = Some(now);
        product.updated_at = Some(now);

        lock(&self.products).push(product.clone());
        Ok(product)
    }

    async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        let mut products = lock(&self.products);
        let existing = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        existing.name.clone_from(&draft.name);
        existing.price = draft.price;
        existing.description.clone_from(&draft.description);
        if draft.image.is_some() {
            existing.image.clone_from(&draft.image);
        }
        existing.category = draft.category;
        existing.shoe_size.clone_from(&draft.shoe_size);
        existing.updated_at = Some(Utc::now());

        Ok(existing.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let mut products = lock(&self.products);
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(products.remove(index))
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut products = lock(&self.products);
        let count = products.len() as u64;
        products.clear();
        Ok(count)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Contact message repository held in memory.
#[derive(Clone, Default)]
pub struct MemoryContactRepository {
    messages: Arc<Mutex<Vec<ContactMessage>>>,
}

impl MemoryContactRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored message, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ContactMessage> {
        lock(&self.messages).clone()
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepository {
    async fn create(
        &self,
        name: &str,
        email: &Email,
        message: &str,
    ) -> Result<ContactMessage, RepositoryError> {
        let now = Utc::now();
        let record = ContactMessage {
            id: ContactId::new(new_id()),
            name: name.to_owned(),
            email: email.as_str().to_owned(),
            message: message.to_owned(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.messages).push(record.clone());
        Ok(record)
    }
}
