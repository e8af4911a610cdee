use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Image shown when a product arrives without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/600x800?text=No+Image";

/// Category label for products that carry neither a `category:` tag nor a
/// product type.
pub const UNCATEGORIZED_LABEL: &str = "uncategorized";

/// Tag prefix that assigns a product to a category explicitly.
const CATEGORY_TAG_PREFIX: &str = "category:";

/// A product snapshot as shown in the storefront grid.
///
/// Snapshots are immutable once fetched; a catalog change means a full reload,
/// never an in-place edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque, globally unique identifier (a Shopify GID for live data).
    pub id: String,
    pub title: String,
    /// Price of the first variant. Never negative.
    pub price: Decimal,
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Average rating in `0.0..=5.0`, when known.
    #[serde(default)]
    pub rating: Option<f32>,
    /// Display-only bullet points, in order.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Units on hand. `None` means unknown, not zero.
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub price: Decimal,
    /// ISO 4217 code, e.g. `"USD"`.
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl Product {
    /// Minimal product with placeholder image and every optional field empty.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            tags: Vec::new(),
            rating: None,
            features: Vec::new(),
            colors: Vec::new(),
            inventory: None,
            variant_id: None,
            description: None,
            vendor: None,
            product_type: None,
            created_at: None,
            updated_at: None,
            variants: Vec::new(),
            images: Vec::new(),
            metafields: Vec::new(),
        }
    }

    /// Category label used by the inventory index.
    ///
    /// A `category:<label>` tag wins, then a non-empty product type, then
    /// [`UNCATEGORIZED_LABEL`].
    #[must_use]
    pub fn category(&self) -> String {
        self.tags
            .iter()
            .find_map(|tag| {
                let lower = tag.to_lowercase();
                lower
                    .strip_prefix(CATEGORY_TAG_PREFIX)
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_owned)
            })
            .or_else(|| {
                self.product_type
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_lowercase)
            })
            .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string())
    }

    /// `true` when the title or any tag contains `needle`.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_title_or_tag(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    /// `true` when the title, a tag, the description, the vendor, or the
    /// product type contains `needle`.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let optional_hit = |field: Option<&String>| {
            field.is_some_and(|value| value.to_lowercase().contains(needle))
        };
        self.matches_title_or_tag(needle)
            || optional_hit(self.description.as_ref())
            || optional_hit(self.vendor.as_ref())
            || optional_hit(self.product_type.as_ref())
    }
}
