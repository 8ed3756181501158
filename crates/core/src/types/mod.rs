//! Core types for the Stride storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod theme;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
pub use product::{Category, Product, ProductType, UnknownVariant};
pub use theme::Theme;
