//! Checkout hand-off.
//!
//! Payment is never processed here. With a hosted payment link configured
//! the buyer is sent there with their email prefilled; without one the
//! order is simulated and the cart is emptied.

use url::Url;

use baby_sneakers_core::{FieldError, Price, ValidationError};

use crate::cart::Cart;

/// Buyer details collected on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl CheckoutDetails {
    fn validate(&self, cart: &Cart) -> Result<(), ValidationError> {
        let mut errors = Vec::new();
        if cart.is_empty() {
            errors.push(FieldError {
                field: "cart",
                message: "is empty",
            });
        }
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("address", &self.address),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    message: "is required",
                });
            }
        }
        ValidationError::check(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Continue at the hosted payment page. The cart is kept until the
    /// buyer comes back from a completed payment.
    Redirect(Url),
    /// No payment link is configured; the order was accepted as a demo and
    /// the cart cleared.
    Simulated { total: Price },
}

/// Validate the order and hand it off.
///
/// # Errors
///
/// Returns `ValidationError` when the cart is empty or a field is blank;
/// the cart is untouched.
pub fn checkout(
    cart: &mut Cart,
    details: &CheckoutDetails,
    payment_link: Option<&Url>,
) -> Result<CheckoutOutcome, ValidationError> {
    details.validate(cart)?;

    if let Some(link) = payment_link {
        let mut url = link.clone();
        url.query_pairs_mut()
            .append_pair("prefilled_email", details.email.trim());
        tracing::info!(items = cart.item_count(), "Handing checkout to payment link");
        return Ok(CheckoutOutcome::Redirect(url));
    }

    let total = cart.total();
    cart.clear();
    tracing::info!(%total, "Simulated checkout completed");
    Ok(CheckoutOutcome::Simulated { total })
}
