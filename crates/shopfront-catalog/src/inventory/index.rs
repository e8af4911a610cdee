//! Immutable, fully built inventory index.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_core::Product;

use crate::client::LoadOutcome;

/// Maximum number of products returned by [`InventoryIndex::search_by_text`].
pub const SEARCH_RESULT_LIMIT: usize = 12;

/// Snapshot of the catalog keyed three ways: by id, by category label, and by
/// tag.
///
/// Built wholesale from a product list and never mutated afterwards. Every id
/// in the category and tag indexes resolves in the primary store.
#[derive(Debug, Default)]
pub struct InventoryIndex {
    /// Primary store, in insertion order.
    products: Vec<Product>,
    positions: HashMap<String, usize>,
    categories: BTreeMap<String, Vec<usize>>,
    tags: BTreeMap<String, Vec<usize>>,
    last_updated: Option<DateTime<Utc>>,
}

/// Counters reported by the inventory endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total_products: usize,
    pub categories: usize,
    pub tags: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub is_loading: bool,
    /// How the load behind this index ended; `None` before the first load.
    pub last_outcome: Option<LoadOutcome>,
    /// Entries in the primary store. Equals `total_products` for any
    /// published index.
    pub cache_size: usize,
}

impl InventoryIndex {
    /// Builds an index from `products`, stamped with the current time.
    #[must_use]
    pub fn build(products: Vec<Product>) -> Self {
        Self::build_at(products, Utc::now())
    }

    /// Builds an index from `products`, stamped with `now`.
    ///
    /// Duplicate ids keep the first occurrence; later ones are skipped with a
    /// warning.
    #[must_use]
    pub fn build_at(products: Vec<Product>, now: DateTime<Utc>) -> Self {
        let mut index = Self {
            products: Vec::with_capacity(products.len()),
            positions: HashMap::with_capacity(products.len()),
            categories: BTreeMap::new(),
            tags: BTreeMap::new(),
            last_updated: Some(now),
        };

        for product in products {
            if index.positions.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "duplicate product id skipped during index build");
                continue;
            }
            let position = index.products.len();

            index
                .categories
                .entry(product.category())
                .or_default()
                .push(position);

            for tag in &product.tags {
                let ids = index.tags.entry(tag.clone()).or_default();
                if ids.last() != Some(&position) {
                    ids.push(position);
                }
            }

            index.positions.insert(product.id.clone(), position);
            index.products.push(product);
        }

        index
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.positions.get(id).map(|&pos| &self.products[pos])
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Up to [`SEARCH_RESULT_LIMIT`] products whose title, tags, description,
    /// vendor, or product type contains `query` (case-insensitive).
    ///
    /// An empty query returns the first [`SEARCH_RESULT_LIMIT`] products in
    /// store order.
    #[must_use]
    pub fn search_by_text(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.products.iter().take(SEARCH_RESULT_LIMIT).collect();
        }
        self.products
            .iter()
            .filter(|p| p.matches_text(&needle))
            .take(SEARCH_RESULT_LIMIT)
            .collect()
    }

    /// Products filed under `label`, in index order. Labels are stored
    /// lowercase, so `label` is matched after trimming and lowercasing.
    #[must_use]
    pub fn by_category(&self, label: &str) -> Vec<&Product> {
        self.resolve(self.categories.get(&label.trim().to_lowercase()))
    }

    /// Products carrying exactly `tag`, in index order.
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Vec<&Product> {
        self.resolve(self.tags.get(tag))
    }

    /// Category labels with their product counts, alphabetically.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(&str, usize)> {
        self.categories
            .iter()
            .map(|(label, ids)| (label.as_str(), ids.len()))
            .collect()
    }

    /// Tags with their product counts, alphabetically.
    #[must_use]
    pub fn tag_counts(&self) -> Vec<(&str, usize)> {
        self.tags
            .iter()
            .map(|(tag, ids)| (tag.as_str(), ids.len()))
            .collect()
    }

    /// Counters for this index. `is_loading` is supplied by the owning store,
    /// which also fills in `last_outcome`.
    #[must_use]
    pub fn stats(&self, is_loading: bool) -> InventoryStats {
        InventoryStats {
            total_products: self.positions.len(),
            categories: self.categories.len(),
            tags: self.tags.len(),
            last_updated: self.last_updated,
            is_loading,
            last_outcome: None,
            cache_size: self.products.len(),
        }
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Product> {
        positions
            .map(|ids| ids.iter().map(|&pos| &self.products[pos]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str, title: &str, tags: &[&str], product_type: Option<&str>) -> Product {
        let mut p = Product::new(id, title, Decimal::new(1000, 2));
        p.tags = tags.iter().map(|t| (*t).to_owned()).collect();
        p.product_type = product_type.map(str::to_owned);
        p
    }

    fn sample() -> Vec<Product> {
        vec![
            product("p1", "Linen Shirt", &["summer", "linen"], Some("Shirts")),
            product("p2", "Wool Coat", &["winter", "category:Outerwear"], Some("Coats")),
            product("p3", "Oxford Shirt", &["office"], Some("Shirts")),
            product("p4", "Mystery Box", &[], None),
        ]
    }

    #[test]
    fn build_indexes_every_product() {
        let index = InventoryIndex::build(sample());
        let stats = index.stats(false);
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.cache_size, 4);
        assert_eq!(stats.categories, 3);
        assert_eq!(stats.tags, 5);
        assert!(stats.last_updated.is_some());
    }

    #[test]
    fn every_indexed_id_resolves() {
        let index = InventoryIndex::build(sample());
        for (label, _) in index.category_counts() {
            for p in index.by_category(label) {
                assert!(index.get(&p.id).is_some());
            }
        }
        for (tag, _) in index.tag_counts() {
            for p in index.by_tag(tag) {
                assert!(index.get(&p.id).is_some());
            }
        }
    }

    #[test]
    fn category_lookup_uses_derived_labels() {
        let index = InventoryIndex::build(sample());
        let ids: Vec<&str> = index.by_category("shirts").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(index.by_category("Outerwear")[0].id, "p2");
        assert_eq!(index.by_category("uncategorized")[0].id, "p4");
    }

    #[test]
    fn unknown_category_and_tag_are_empty() {
        let index = InventoryIndex::build(sample());
        assert!(index.by_category("spacesuits").is_empty());
        assert!(index.by_tag("spring").is_empty());
    }

    #[test]
    fn tag_lookup_is_exact() {
        let index = InventoryIndex::build(sample());
        assert_eq!(index.by_tag("summer").len(), 1);
        assert!(index.by_tag("Summer").is_empty());
        assert!(index.by_tag("summ").is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut products = sample();
        products.push(product("p1", "Impostor", &["impostor"], None));
        let index = InventoryIndex::build(products);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get("p1").map(|p| p.title.as_str()), Some("Linen Shirt"));
        assert!(index.by_tag("impostor").is_empty());
    }

    #[test]
    fn repeated_tag_on_one_product_is_indexed_once() {
        let index = InventoryIndex::build(vec![product("p1", "Tee", &["cotton", "cotton"], None)]);
        assert_eq!(index.by_tag("cotton").len(), 1);
    }

    #[test]
    fn empty_search_returns_first_twelve_in_order() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(&format!("p{i}"), &format!("Item {i}"), &[], None))
            .collect();
        let index = InventoryIndex::build(products);
        let hits = index.search_by_text("  ");
        assert_eq!(hits.len(), SEARCH_RESULT_LIMIT);
        assert_eq!(hits[0].id, "p0");
        assert_eq!(hits[11].id, "p11");
    }

    #[test]
    fn search_matches_extended_fields_case_insensitively() {
        let mut products = sample();
        products[3].vendor = Some("Atelier North".to_owned());
        let index = InventoryIndex::build(products);

        let ids: Vec<&str> = index.search_by_text("SHIRT").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert_eq!(index.search_by_text("atelier")[0].id, "p4");
        assert_eq!(index.search_by_text("coats")[0].id, "p2");
        assert!(index.search_by_text("velvet").is_empty());
    }

    #[test]
    fn search_caps_matches() {
        let products: Vec<Product> = (0..30)
            .map(|i| product(&format!("p{i}"), "Shirt", &[], None))
            .collect();
        let index = InventoryIndex::build(products);
        assert_eq!(index.search_by_text("shirt").len(), SEARCH_RESULT_LIMIT);
    }

    #[test]
    fn default_index_is_empty_and_never_updated() {
        let index = InventoryIndex::default();
        assert!(index.is_empty());
        assert!(index.last_updated().is_none());
        assert_eq!(index.stats(false).cache_size, 0);
    }
}
