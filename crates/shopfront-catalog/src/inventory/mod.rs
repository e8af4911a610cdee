//! In-memory inventory built from a bulk catalog load.

mod index;
mod store;

pub use index::{InventoryIndex, InventoryStats, SEARCH_RESULT_LIMIT};
pub use store::{InventoryStore, ReloadReport};
