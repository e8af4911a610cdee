//! Product catalog access for the storefront.
//!
//! Talks to the Shopify Storefront GraphQL API, normalizes its records into
//! [`shopfront_core::Product`], falls back to the bundled mock catalog when the
//! live store is unavailable, and keeps a bulk-loaded [`InventoryStore`] for
//! category/tag browsing.

pub mod client;
pub mod error;
pub mod inventory;
pub mod normalize;
pub mod pagination;
pub mod query;
pub mod sources;
pub mod types;

mod rate_limit;

pub use client::{BulkLoad, BulkLoader, BulkOptions, ClientSettings, LoadOutcome, StorefrontClient};
pub use error::{CatalogError, InventoryError};
pub use inventory::{InventoryIndex, InventoryStats, InventoryStore, ReloadReport};
pub use normalize::normalize_product;
pub use sources::{CatalogClient, FallbackChain, MockSource, ProductSource, SourcedProducts, StorefrontSource};
pub use types::{PageInfo, StorefrontProduct};
