//! Wire types shared with the outfit-completion and answer services.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::Product;

/// Shown when the completion service answered with something unusable.
pub const RETRY_TIP: &str = "We couldn't put an outfit together this time. Please try again.";

/// A primary outfit, alternatives, and free-form styling tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRecommendation {
    pub primary_outfit: Outfit,
    #[serde(default)]
    pub alternative_outfits: Vec<Outfit>,
    #[serde(default)]
    pub styling_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outfit {
    #[serde(default)]
    pub name: String,
    pub items: Vec<OutfitItem>,
    /// As reported by the service; not re-added from item prices.
    #[serde(default)]
    pub total_cost: Decimal,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitItem {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub justification: String,
}

impl OutfitRecommendation {
    /// Empty recommendation returned in place of an unparsable reply.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            primary_outfit: Outfit {
                name: String::new(),
                items: Vec::new(),
                total_cost: Decimal::ZERO,
                rationale: String::new(),
            },
            alternative_outfits: Vec::new(),
            styling_tips: vec![RETRY_TIP.to_owned()],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_outfit.items.is_empty()
            && self.alternative_outfits.iter().all(|o| o.items.is_empty())
    }
}

/// Condensed product record sent to the external services.
///
/// `in_stock` is always `true`: every catalog item is eligible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    pub tags: Vec<String>,
    pub inventory: i64,
    pub image: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            tags: product.tags.clone(),
            inventory: product.inventory.unwrap_or(0),
            image: product.image_url.clone(),
            in_stock: true,
        }
    }
}
