//! The static product catalog.
//!
//! Products are loaded once from JSON and never change while the process
//! runs. Lookups are linear scans; the catalog is small enough that an index
//! would only add bookkeeping.

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Category, Product, ProductId};

/// Catalog bundled with the crate, used when no external file is configured.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id {0} in catalog")]
    DuplicateId(ProductId),
}

/// Immutable, ordered list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] for the first repeated id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data file is broken.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in `category`, catalog order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Up to `limit` featured products in catalog order.
    #[must_use]
    pub fn featured(&self, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_featured)
            .take(limit)
            .collect()
    }

    /// Up to `limit` products flagged new, newest first.
    #[must_use]
    pub fn new_arrivals(&self, limit: usize) -> Vec<&Product> {
        let mut arrivals: Vec<&Product> = self.products.iter().filter(|p| p.is_new).collect();
        arrivals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        arrivals.truncate(limit);
        arrivals
    }

    /// Up to `limit` other products from the same category as `product`,
    /// preferring the same product type.
    #[must_use]
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        let mut related: Vec<&Product> = self
            .in_category(product.category)
            .filter(|p| p.id != product.id)
            .collect();
        related.sort_by_key(|p| p.product_type != product.product_type);
        related.truncate(limit);
        related
    }
}
