//! Shopping cart.
//!
//! A cart is an ordered list of [`CartItem`] lines. Each line is identified by
//! its [`LineKey`] (product id, selected size, selected color) and no two
//! lines ever share a key: adding a product variant that is already present
//! bumps that line's quantity instead of appending.
//!
//! [`Cart`] is the pure collection; [`CartStore`] wraps it with hydration from
//! and persistence to a [`Storage`].

use serde::{Deserialize, Serialize};

use crate::storage::{self, Storage, keys};
use crate::types::{Price, Product, ProductId};

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    #[must_use]
    pub fn new(id: ProductId, size: Option<String>, color: Option<String>) -> Self {
        Self {
            id,
            size: normalize_option(size),
            color: normalize_option(color),
        }
    }
}

/// A product in the cart with the variant the shopper picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

impl CartItem {
    /// Build a line for `product`. Blank size/color selections are treated as
    /// no selection and a zero quantity is raised to one.
    #[must_use]
    pub fn new(
        product: Product,
        quantity: u32,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) -> Self {
        Self {
            product,
            quantity: quantity.max(1),
            selected_size: normalize_option(selected_size),
            selected_color: normalize_option(selected_color),
        }
    }

    /// This line's identity.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.product.id,
            size: self.selected_size.clone(),
            color: self.selected_color.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.id
            && self.selected_size == key.size
            && self.selected_color == key.color
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

fn normalize_option(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Ordered cart lines with unique [`LineKey`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from arbitrary lines, merging duplicates.
    ///
    /// Used on hydration so a snapshot edited by hand still satisfies the
    /// unique-key invariant.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(CartItem::new(
                item.product,
                item.quantity,
                item.selected_size,
                item.selected_color,
            ));
        }
        cart
    }

    /// Merge `item` into the cart.
    ///
    /// If a line with the same key exists its quantity grows by
    /// `item.quantity`; otherwise the line is appended.
    pub fn add(&mut self, item: CartItem) {
        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|line| line.matches(&key)) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Overwrite the quantity of the line matching `key`, clamped to at
    /// least one. Returns whether a line matched.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        match self.items.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                line.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    /// Remove the line matching `key`. Returns whether a line was removed.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| !line.matches(key));
        self.items.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Find the line matching `key`.
    #[must_use]
    pub fn get(&self, key: &LineKey) -> Option<&CartItem> {
        self.items.iter().find(|line| line.matches(key))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

/// A [`Cart`] bound to the storage it was hydrated from.
///
/// Every mutating call writes the full cart back under [`keys::CART`].
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    storage: S,
    cart: Cart,
}

impl<S: Storage> CartStore<S> {
    /// Open the cart kept in `storage`.
    ///
    /// A missing or unreadable snapshot yields an empty cart.
    pub fn hydrate(storage: S) -> Self {
        let items: Vec<CartItem> = storage::load_json(&storage, keys::CART).unwrap_or_default();
        Self {
            cart: Cart::from_items(items),
            storage,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_to_cart(&mut self, item: CartItem) {
        self.cart.add(item);
        self.persist();
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) -> bool {
        let updated = self.cart.update_quantity(key, quantity);
        self.persist();
        updated
    }

    pub fn remove_from_cart(&mut self, key: &LineKey) -> bool {
        let removed = self.cart.remove(key);
        self.persist();
        removed
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Release the storage, e.g. to commit staged writes.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        storage::save_json(&mut self.storage, keys::CART, &self.cart);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::{Category, ProductType};

    pub(crate) fn product(id: u32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: "Test product".to_string(),
            price: Price::from_cents(cents),
            rating: 4.0,
            category: Category::Men,
            product_type: ProductType::Footwear,
            colors: vec!["Black".to_string(), "White".to_string()],
            sizes: vec!["9".to_string(), "10".to_string()],
            materials: Vec::new(),
            is_new: false,
            is_featured: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn line(id: u32, qty: u32, size: &str, color: &str) -> CartItem {
        CartItem::new(
            product(id, 1000),
            qty,
            Some(size.to_string()),
            Some(color.to_string()),
        )
    }

    fn key(id: u32, size: &str, color: &str) -> LineKey {
        LineKey::new(
            ProductId::new(id),
            Some(size.to_string()),
            Some(color.to_string()),
        )
    }

    #[test]
    fn test_add_merges_same_variant() {
        let mut cart = Cart::new();
        cart.add(line(1, 1, "9", "Black"));
        cart.add(line(1, 2, "9", "Black"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_keeps_distinct_variants_apart() {
        let mut cart = Cart::new();
        cart.add(line(1, 1, "9", "Black"));
        cart.add(line(1, 1, "10", "Black"));
        cart.add(line(1, 1, "9", "White"));
        cart.add(line(2, 1, "9", "Black"));

        assert_eq!(cart.len(), 4);
    }

    #[test]
    fn test_blank_selection_is_no_selection() {
        let mut cart = Cart::new();
        cart.add(CartItem::new(product(5, 500), 1, Some("  ".to_string()), None));
        cart.add(CartItem::new(product(5, 500), 1, None, Some(String::new())));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = Cart::new();
        cart.add(line(1, 4, "9", "Black"));

        assert!(cart.update_quantity(&key(1, "9", "Black"), 0));
        assert_eq!(cart.items()[0].quantity, 1);

        assert!(cart.update_quantity(&key(1, "9", "Black"), 6));
        assert_eq!(cart.items()[0].quantity, 6);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add(line(1, 1, "9", "Black"));
        let before = cart.clone();

        assert!(!cart.update_quantity(&key(99, "9", "Black"), 5));
        assert!(!cart.remove(&key(1, "10", "Black")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(CartItem::new(product(1, 12999), 2, None, None));
        cart.add(CartItem::new(product(2, 2500), 1, None, None));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_cents(28498));
    }

    #[test]
    fn test_store_persists_every_mutation() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = CartStore::hydrate(&mut storage);
            store.add_to_cart(line(1, 2, "9", "Black"));
        }
        let raw = storage.get_item(keys::CART).unwrap();
        assert!(raw.contains("\"selectedSize\":\"9\""));
        assert!(raw.contains("\"quantity\":2"));

        let mut store = CartStore::hydrate(&mut storage);
        assert_eq!(store.cart().item_count(), 2);
        store.clear_cart();
        assert_eq!(storage.get_item(keys::CART).as_deref(), Some("[]"));
    }

    #[test]
    fn test_hydrate_from_corrupt_snapshot_is_empty() {
        let storage = MemoryStorage::with_values([(keys::CART, "[{\"id\":")]);
        let store = CartStore::hydrate(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_hydrate_merges_duplicate_lines() {
        let items = vec![line(1, 1, "9", "Black"), line(1, 2, "9", "Black")];
        let storage =
            MemoryStorage::with_values([(keys::CART, serde_json::to_string(&items).unwrap())]);

        let store = CartStore::hydrate(storage);
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().items()[0].quantity, 3);
    }

    proptest! {
        #[test]
        fn prop_same_key_adds_sum_quantities(quantities in prop::collection::vec(1u32..20, 1..12)) {
            let mut cart = Cart::new();
            for qty in &quantities {
                cart.add(line(7, *qty, "10", "White"));
            }

            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(cart.items()[0].quantity, quantities.iter().sum::<u32>());
        }

        #[test]
        fn prop_remove_drops_at_most_one_line(
            ids in prop::collection::vec(1u32..6, 0..10),
            target in 1u32..8,
        ) {
            let mut cart = Cart::new();
            for id in &ids {
                cart.add(line(*id, 1, "9", "Black"));
            }
            let before = cart.clone();

            let removed = cart.remove(&key(target, "9", "Black"));

            prop_assert!(before.len() - cart.len() <= 1);
            prop_assert_eq!(removed, before.len() != cart.len());
            let survivors: Vec<_> = before
                .items()
                .iter()
                .filter(|item| item.product.id != ProductId::new(target))
                .cloned()
                .collect();
            prop_assert_eq!(cart.items(), survivors.as_slice());
        }
    }
}
