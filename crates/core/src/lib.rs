//! Baby Sneakers Core - Shared domain types.
//!
//! This crate provides the types shared by every Baby Sneakers component:
//! - `api` - Catalog and contact REST service
//! - `storefront` - Client-side catalog, cart, and session state
//! - `cli` - Command-line tools for migrations and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. Both the server and the client validate product
//! and contact input with the same rules defined here.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, categories, emails, products, and contact messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
