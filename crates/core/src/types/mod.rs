//! Core types for Baby Sneakers.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod category;
pub mod contact;
pub mod email;
pub mod id;
pub mod price;
pub mod product;

pub use category::{Category, CategoryParseError};
pub use contact::{ContactMessage, ContactSubmission};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{FieldError, Product, ProductDraft, ValidationError};
