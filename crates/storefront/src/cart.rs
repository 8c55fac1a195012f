//! Shopping cart state.
//!
//! One line per product id, never at quantity zero. The open/closed flag is
//! view state: it is not part of the snapshot, so a restored cart is closed.

use serde::{Deserialize, Serialize};

use baby_sneakers_core::{Price, Product, ProductId};

/// A cart line.
///
/// `image` only ever holds a URL. Inline `data:` images stay in the catalog
/// and are looked up there by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Persisted form of the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
    is_open: bool,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn open(&mut self) {
        self.is_open = true;
    }

    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Add one unit of `product`, creating the line if needed.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.line_mut(&product.id) {
            item.quantity += 1;
            return;
        }
        self.items.push(CartItem {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: linked_image(product.image.as_deref()),
            quantity: 1,
        });
    }

    /// Drop the line for `id` entirely.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Add one unit to an existing line. No-op when absent.
    pub fn increment(&mut self, id: &ProductId) {
        if let Some(item) = self.line_mut(id) {
            item.quantity += 1;
        }
    }

    /// Remove one unit; the line goes away when it reaches zero.
    pub fn decrement(&mut self, id: &ProductId) {
        let Some(item) = self.line_mut(id) else {
            return;
        };
        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.remove(id);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Total number of units.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
        }
    }

    /// Replace the lines from a snapshot. Zero-quantity and repeated lines
    /// are dropped; the cart comes back closed.
    pub fn restore(&mut self, snapshot: CartSnapshot) {
        self.items.clear();
        for item in snapshot.items {
            if item.quantity > 0 && self.line_mut(&item.id).is_none() {
                let image = linked_image(item.image.as_deref());
                self.items.push(CartItem { image, ..item });
            }
        }
        self.is_open = false;
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

fn linked_image(image: Option<&str>) -> Option<String> {
    image.filter(|src| !src.starts_with("data:")).map(str::to_string)
}
