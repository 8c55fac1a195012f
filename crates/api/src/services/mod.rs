//! Outbound services used by the API handlers.
//!
//! - `email` - SMTP relay for contact notifications and diagnostics

pub mod email;

pub use email::{EmailError, EmailService};
