//! Checkout form validation and simulated order placement.
//!
//! There is no payment step: a valid form plus a non-empty cart produces an
//! [`OrderConfirmation`], and the caller clears the cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::Cart;
use crate::types::{Email, EmailError, Price};

/// Reasons a checkout submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("cart is empty")]
    EmptyCart,
}

/// Raw checkout form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
}

/// A checkout form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub full_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl CheckoutForm {
    /// Check required fields and parse the email.
    ///
    /// # Errors
    ///
    /// Returns the first missing field in form order, or an invalid email.
    pub fn validate(&self) -> Result<ShippingDetails, CheckoutError> {
        let full_name = required(&self.full_name, "full name")?;
        let email = required(&self.email, "email")?;
        let address = required(&self.address, "address")?;
        let city = required(&self.city, "city")?;
        let postal_code = required(&self.postal_code, "postal code")?;
        let country = required(&self.country, "country")?;

        Ok(ShippingDetails {
            full_name,
            email: Email::parse(&email)?,
            address,
            city,
            postal_code,
            country,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CheckoutError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Summary shown after a simulated order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    /// Human-facing order reference, e.g. `STR-1A2B3C4D`.
    pub reference: String,
    pub shipping: ShippingDetails,
    pub item_count: u32,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Confirm an order for everything in `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
    pub fn place(shipping: ShippingDetails, cart: &Cart) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let simple = Uuid::new_v4().simple().to_string();
        let reference = format!("STR-{}", simple.get(..8).unwrap_or(&simple).to_uppercase());

        Ok(Self {
            reference,
            shipping,
            item_count: cart.item_count(),
            total: cart.subtotal(),
            placed_at: Utc::now(),
        })
    }
}
