//! Stride Core - catalog and client-state domain library.
//!
//! This crate holds everything the storefront needs that does not touch the
//! network:
//! - [`types`] - Newtype wrappers for product ids, prices, emails and themes
//! - [`catalog`] - The static product list and its lookups
//! - [`filter`] - Predicate composition and sort orders over the catalog
//! - [`storage`] - The client-scoped key/value storage seam
//! - [`cart`] / [`wishlist`] - Stores persisted through [`storage::Storage`]
//! - [`checkout`] - Checkout form validation and order summaries
//! - [`chat`] - Wire types for the support chat webhook
//!
//! # Architecture
//!
//! Stores never reach for global state. They are generic over a
//! [`storage::Storage`] implementation which the caller injects, hydrate once
//! when opened, and write a snapshot back after every mutation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod chat;
pub mod checkout;
pub mod filter;
pub mod storage;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartItem, CartStore, LineKey};
pub use catalog::{Catalog, CatalogError};
pub use filter::{ProductFilter, SortOrder};
pub use storage::{MemoryStorage, Storage};
pub use types::*;
pub use wishlist::{Wishlist, WishlistItem, WishlistStore};
