//! Shared owner of the current [`InventoryIndex`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use shopfront_core::Product;

use crate::client::{BulkLoader, LoadOutcome};
use crate::error::InventoryError;

use super::index::{InventoryIndex, InventoryStats};

/// Result of a successful [`InventoryStore::reload`].
#[derive(Debug, Clone, Serialize)]
pub struct ReloadReport {
    pub stats: InventoryStats,
    pub pages: usize,
    pub outcome: LoadOutcome,
}

/// An index together with how the load that produced it ended.
#[derive(Debug, Default)]
struct Published {
    index: Arc<InventoryIndex>,
    /// `None` until the first publish.
    outcome: Option<LoadOutcome>,
}

/// Holds the published index and swaps in replacements atomically.
///
/// Readers take an `Arc` snapshot and never observe a half-built index.
/// Rebuilds are serialized: a second reload waits for the first to finish.
#[derive(Debug, Default)]
pub struct InventoryStore {
    current: RwLock<Published>,
    loading: AtomicBool,
    rebuild_guard: tokio::sync::Mutex<()>,
}

/// Clears the loading flag on drop, including when a reload is cancelled.
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl InventoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently published index.
    #[must_use]
    pub fn snapshot(&self) -> Arc<InventoryIndex> {
        self.current().0
    }

    /// How the load behind the published index ended. A direct
    /// [`rebuild`](Self::rebuild) counts as complete.
    #[must_use]
    pub fn last_outcome(&self) -> Option<LoadOutcome> {
        self.current().1
    }

    /// The published index and its load outcome, read together.
    #[must_use]
    pub fn current(&self) -> (Arc<InventoryIndex>, Option<LoadOutcome>) {
        let published = self.current.read().unwrap_or_else(PoisonError::into_inner);
        (Arc::clone(&published.index), published.outcome.clone())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stats(&self) -> InventoryStats {
        let (index, outcome) = self.current();
        let mut stats = index.stats(self.is_loading());
        stats.last_outcome = outcome;
        stats
    }

    /// Replaces the index with one built from `products`.
    pub async fn rebuild(&self, products: Vec<Product>) -> InventoryStats {
        let _guard = self.rebuild_guard.lock().await;
        let _loading = LoadingFlag::raise(&self.loading);
        self.publish(products, LoadOutcome::Complete)
    }

    /// Bulk-loads the catalog through `loader` and publishes the result.
    ///
    /// A partial load (page failure, bound reached) still replaces the index
    /// as long as it produced at least one product. Its outcome is kept and
    /// reported by [`last_outcome`](Self::last_outcome).
    ///
    /// # Errors
    ///
    /// - [`InventoryError::MissingCredentials`] if `loader` has no Storefront
    ///   credentials. The current index is left untouched.
    /// - [`InventoryError::LoadFailed`] if the load stopped early with no
    ///   products. The current index is left untouched.
    pub async fn reload(&self, loader: &BulkLoader) -> Result<ReloadReport, InventoryError> {
        if !loader.has_credentials() {
            return Err(InventoryError::MissingCredentials);
        }

        let _guard = self.rebuild_guard.lock().await;
        let _loading = LoadingFlag::raise(&self.loading);

        let load = loader.load_all().await;
        if load.outcome == LoadOutcome::MissingCredentials {
            return Err(InventoryError::MissingCredentials);
        }
        if load.products.is_empty() && !load.outcome.is_complete() {
            tracing::warn!(outcome = %load.outcome, "inventory reload produced nothing, keeping current index");
            return Err(InventoryError::LoadFailed(load.outcome.to_string()));
        }

        let stats = self.publish(load.products, load.outcome.clone());
        tracing::info!(
            total = stats.total_products,
            categories = stats.categories,
            tags = stats.tags,
            pages = load.pages,
            outcome = %load.outcome,
            "inventory reloaded"
        );

        Ok(ReloadReport {
            stats,
            pages: load.pages,
            outcome: load.outcome,
        })
    }

    fn publish(&self, products: Vec<Product>, outcome: LoadOutcome) -> InventoryStats {
        let index = Arc::new(InventoryIndex::build(products));
        let mut stats = index.stats(false);
        stats.last_outcome = Some(outcome.clone());
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Published {
            index,
            outcome: Some(outcome),
        };
        stats
    }
}
