//! Product grid filtering and sorting.
//!
//! A [`ProductFilter`] is a conjunction of optional predicates. Inactive
//! predicates (no category, empty color list, blank search) match
//! everything. The result keeps catalog order until a [`SortOrder`] is
//! applied; both sorts are stable.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Category, Product, ProductType};

/// Ordering of the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Featured products first, otherwise catalog order.
    #[default]
    Featured,
    /// Most recently created first.
    Newest,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::Newest => "newest",
        }
    }

    /// Sort `products` in place.
    pub fn sort(self, products: &mut [&Product]) {
        match self {
            Self::Featured => products.sort_by_key(|p| !p.is_featured),
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "featured" => Ok(Self::Featured),
            "newest" => Ok(Self::Newest),
            _ => Err(()),
        }
    }
}

/// Active predicates and sort order for a product grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub product_type: Option<ProductType>,
    /// Product must offer at least one of these colors.
    pub colors: Vec<String>,
    /// Product must offer at least one of these sizes. Ignored for
    /// one-size product types.
    pub sizes: Vec<String>,
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ProductFilter {
    /// Filter for a category landing page.
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Build a filter from decoded query-string pairs.
    ///
    /// Recognised keys are `category`, `type`, `color`, `size`, `q` and
    /// `sort`. `color` and `size` may repeat or hold comma-separated lists.
    /// Unknown keys and unparseable values are ignored.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "category" => filter.category = value.parse().ok(),
                "type" => filter.product_type = value.parse().ok(),
                "color" => push_list(&mut filter.colors, value),
                "size" => push_list(&mut filter.sizes, value),
                "q" => filter.search = Some(value.to_owned()),
                "sort" => filter.sort = value.parse().unwrap_or_default(),
                _ => {}
            }
        }
        filter
    }

    /// Whether any predicate is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || self.product_type.is_some()
            || !self.colors.is_empty()
            || !self.sizes.is_empty()
            || self.search.is_some()
    }

    /// Whether `product` passes every active predicate.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self.product_type.is_some_and(|t| t != product.product_type) {
            return false;
        }
        if !self.colors.is_empty() && !self.colors.iter().any(|c| product.has_color(c)) {
            return false;
        }
        if !self.sizes.is_empty()
            && product.product_type.is_sized()
            && !self.sizes.iter().any(|s| product.has_size(s))
        {
            return false;
        }
        if let Some(term) = &self.search {
            let needle = term.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle)
                || product.category.as_str().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }

    /// Matching products, sorted.
    #[must_use]
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let mut matched: Vec<&Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        self.sort.sort(&mut matched);
        matched
    }
}

fn push_list(list: &mut Vec<String>, value: &str) {
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !list.iter().any(|existing| existing.eq_ignore_ascii_case(part)) {
            list.push(part.to_owned());
        }
    }
}

/// Distinct colors and sizes offered by a set of products, in first-seen
/// order. Feeds the filter sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
}

impl Facets {
    #[must_use]
    pub fn collect<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        let mut facets = Self::default();
        for product in products {
            for color in &product.colors {
                push_list(&mut facets.colors, color);
            }
            for size in &product.sizes {
                push_list(&mut facets.sizes, size);
            }
        }
        facets
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::cart::tests::product;
    use crate::types::ProductId;

    fn ids(products: &[&Product]) -> Vec<u32> {
        products.iter().map(|p| p.id.as_u32()).collect()
    }

    fn sample() -> Vec<Product> {
        let mut runner = product(1, 12000);
        runner.name = "Cloud Runner".to_string();
        runner.is_featured = true;
        runner.created_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let mut tee = product(2, 3000);
        tee.name = "Everyday Tee".to_string();
        tee.category = Category::Women;
        tee.product_type = ProductType::Clothing;
        tee.colors = vec!["Red".to_string()];
        tee.sizes = vec!["S".to_string(), "M".to_string()];
        tee.created_at = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

        let mut tote = product(3, 4500);
        tote.name = "Canvas Tote".to_string();
        tote.description = "Roomy bag for the gym".to_string();
        tote.product_type = ProductType::Bag;
        tote.sizes = Vec::new();
        tote.is_featured = true;
        tote.created_at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

        let mut kids = product(4, 5000);
        kids.category = Category::Kids;
        kids.sizes = vec!["1Y".to_string()];

        vec![runner, tee, tote, kids]
    }

    #[test]
    fn test_empty_filter_matches_all_in_catalog_order() {
        let products = sample();
        let filter = ProductFilter::default();
        assert!(!filter.is_active());
        assert_eq!(ids(&filter.apply(&products)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let products = sample();
        let result = ProductFilter::for_category(Category::Men).apply(&products);
        assert!(result.iter().all(|p| p.category == Category::Men));
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_color_filter_is_intersection() {
        let products = sample();
        let filter = ProductFilter {
            colors: vec!["red".to_string(), "green".to_string()],
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&products)), vec![2]);
    }

    #[test]
    fn test_size_filter_skips_bags_and_accessories() {
        let products = sample();
        let filter = ProductFilter {
            sizes: vec!["10".to_string()],
            ..ProductFilter::default()
        };
        // The tote has no sizes but stays because bags are one-size.
        assert_eq!(ids(&filter.apply(&products)), vec![1, 3]);
    }

    #[test]
    fn test_search_covers_name_description_category() {
        let products = sample();
        let by_name = ProductFilter {
            search: Some("RUNNER".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&by_name.apply(&products)), vec![1]);

        let by_description = ProductFilter {
            search: Some("gym".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&by_description.apply(&products)), vec![3]);

        let by_category = ProductFilter {
            search: Some("Kids".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&by_category.apply(&products)), vec![4]);
    }

    #[test]
    fn test_featured_sort_places_featured_first() {
        let mut featured = product(1, 100);
        featured.is_featured = true;
        let plain = product(2, 100);

        let products = vec![plain, featured];
        let result = ProductFilter::for_category(Category::Men).apply(&products);
        assert_eq!(result[0].id, ProductId::new(1));
        assert_eq!(result[1].id, ProductId::new(2));
    }

    #[test]
    fn test_newest_sort() {
        let products = sample();
        let filter = ProductFilter {
            sort: SortOrder::Newest,
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&products)), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_from_pairs() {
        let filter = ProductFilter::from_pairs([
            ("category", "women"),
            ("type", "clothing"),
            ("color", "Red,Blue"),
            ("color", "red"),
            ("size", "M"),
            ("q", "  tee "),
            ("sort", "newest"),
            ("page", "2"),
        ]);
        assert_eq!(filter.category, Some(Category::Women));
        assert_eq!(filter.product_type, Some(ProductType::Clothing));
        assert_eq!(filter.colors, vec!["Red".to_string(), "Blue".to_string()]);
        assert_eq!(filter.sizes, vec!["M".to_string()]);
        assert_eq!(filter.search.as_deref(), Some("tee"));
        assert_eq!(filter.sort, SortOrder::Newest);
    }

    #[test]
    fn test_from_pairs_ignores_garbage() {
        let filter = ProductFilter::from_pairs([("category", "aliens"), ("sort", "cheapest"), ("q", "")]);
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn test_facets_dedupe_in_first_seen_order() {
        let products = sample();
        let facets = Facets::collect(&products);
        assert_eq!(facets.colors, vec!["Black", "White", "Red"]);
        assert_eq!(facets.sizes, vec!["9", "10", "S", "M", "1Y"]);
    }

    proptest! {
        #[test]
        fn prop_newest_is_non_increasing(days in prop::collection::vec(0i64..2000, 0..25)) {
            let products: Vec<Product> = days
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let mut p = product(u32::try_from(i).unwrap(), 100);
                    p.created_at += chrono::Duration::days(*d);
                    p
                })
                .collect();

            let filter = ProductFilter { sort: SortOrder::Newest, ..ProductFilter::default() };
            let sorted = filter.apply(&products);
            prop_assert!(sorted.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        }

        #[test]
        fn prop_category_filter_only_returns_that_category(
            cats in prop::collection::vec(0usize..3, 0..20),
            wanted in 0usize..3,
        ) {
            let products: Vec<Product> = cats
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let mut p = product(u32::try_from(i).unwrap(), 100);
                    p.category = Category::ALL[*c];
                    p
                })
                .collect();

            let category = Category::ALL[wanted];
            let result = ProductFilter::for_category(category).apply(&products);
            prop_assert!(result.iter().all(|p| p.category == category));
            prop_assert_eq!(result.len(), cats.iter().filter(|c| **c == wanted).count());
        }
    }
}
