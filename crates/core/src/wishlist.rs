//! Wishlist of saved products, unique by product id.

use serde::{Deserialize, Serialize};

use crate::storage::{self, Storage, keys};
use crate::types::{Product, ProductId};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistItem {
    pub product: Product,
}

impl From<Product> for WishlistItem {
    fn from(product: Product) -> Self {
        Self { product }
    }
}

/// Saved products in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Wishlist {
    items: Vec<WishlistItem>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a wishlist keeping the first occurrence of each id.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = WishlistItem>) -> Self {
        let mut wishlist = Self::new();
        for item in items {
            wishlist.add(item.product);
        }
        wishlist
    }

    /// Save `product`. Returns `false` if it was already saved.
    pub fn add(&mut self, product: Product) -> bool {
        if self.contains(product.id) {
            return false;
        }
        self.items.push(WishlistItem { product });
        true
    }

    /// Forget `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != id);
        self.items.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.product.id == id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A [`Wishlist`] bound to its storage; persists under [`keys::WISHLIST`].
#[derive(Debug)]
pub struct WishlistStore<S: Storage> {
    storage: S,
    wishlist: Wishlist,
}

impl<S: Storage> WishlistStore<S> {
    /// Open the wishlist kept in `storage`, empty if missing or unreadable.
    pub fn hydrate(storage: S) -> Self {
        let items: Vec<WishlistItem> =
            storage::load_json(&storage, keys::WISHLIST).unwrap_or_default();
        Self {
            wishlist: Wishlist::from_items(items),
            storage,
        }
    }

    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn add_to_wishlist(&mut self, product: Product) -> bool {
        let added = self.wishlist.add(product);
        self.persist();
        added
    }

    pub fn remove_from_wishlist(&mut self, id: ProductId) -> bool {
        let removed = self.wishlist.remove(id);
        self.persist();
        removed
    }

    #[must_use]
    pub fn is_in_wishlist(&self, id: ProductId) -> bool {
        self.wishlist.contains(id)
    }

    /// Add `product` if absent, remove it if present. Returns the new
    /// membership.
    pub fn toggle(&mut self, product: Product) -> bool {
        let id = product.id;
        if self.wishlist.contains(id) {
            self.remove_from_wishlist(id);
            false
        } else {
            self.add_to_wishlist(product);
            true
        }
    }

    pub fn clear_wishlist(&mut self) {
        self.wishlist.clear();
        self.persist();
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        storage::save_json(&mut self.storage, keys::WISHLIST, &self.wishlist);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::cart::tests::product;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_add_is_idempotent() {
        let mut store = WishlistStore::hydrate(MemoryStorage::new());
        assert!(store.add_to_wishlist(product(1, 1000)));
        assert!(!store.add_to_wishlist(product(1, 1000)));
        assert_eq!(store.wishlist().len(), 1);
    }

    #[test]
    fn test_remove_and_membership() {
        let mut store = WishlistStore::hydrate(MemoryStorage::new());
        store.add_to_wishlist(product(1, 1000));
        store.add_to_wishlist(product(2, 1000));

        assert!(store.is_in_wishlist(ProductId::new(2)));
        assert!(store.remove_from_wishlist(ProductId::new(2)));
        assert!(!store.is_in_wishlist(ProductId::new(2)));
        assert!(!store.remove_from_wishlist(ProductId::new(42)));
        assert_eq!(store.wishlist().len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut store = WishlistStore::hydrate(MemoryStorage::new());
        assert!(store.toggle(product(3, 1000)));
        assert!(!store.toggle(product(3, 1000)));
        assert!(store.wishlist().is_empty());
    }

    #[test]
    fn test_persist_and_rehydrate() {
        let mut storage = MemoryStorage::new();
        {
            let mut store = WishlistStore::hydrate(&mut storage);
            store.add_to_wishlist(product(4, 1000));
            store.add_to_wishlist(product(5, 1000));
        }

        let raw = storage.get_item(keys::WISHLIST).unwrap();
        assert!(raw.starts_with("[{\"id\":4"));

        let mut store = WishlistStore::hydrate(&mut storage);
        assert!(store.is_in_wishlist(ProductId::new(5)));
        store.clear_wishlist();
        assert!(store.wishlist().is_empty());
        assert_eq!(storage.get_item(keys::WISHLIST).as_deref(), Some("[]"));
    }

    #[test]
    fn test_unreadable_snapshot_falls_back_to_empty() {
        let storage = MemoryStorage::with_values([(keys::WISHLIST, "\"not a list\"")]);
        let store = WishlistStore::hydrate(storage);
        assert!(store.wishlist().is_empty());
    }

    proptest! {
        #[test]
        fn prop_wishlist_ids_stay_unique(ids in prop::collection::vec(1u32..10, 0..30)) {
            let mut wishlist = Wishlist::new();
            for id in &ids {
                wishlist.add(product(*id, 1000));
            }

            let mut seen: Vec<ProductId> = wishlist.items().iter().map(|i| i.product.id).collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            prop_assert_eq!(seen.len(), total);
        }
    }
}
