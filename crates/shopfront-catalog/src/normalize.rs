//! Normalization from Storefront GraphQL nodes to [`shopfront_core::Product`].
//!
//! Normalization never fails: every missing or unparsable field falls back to
//! a display default so a single odd record cannot sink a page.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shopfront_core::{Metafield, Product, ProductImage, ProductVariant, PLACEHOLDER_IMAGE_URL};

use crate::types::{StorefrontMetafield, StorefrontProduct, StorefrontVariant};

/// Rating shown for live products that carry no `rating` metafield.
pub const DEFAULT_REMOTE_RATING: f32 = 4.5;

const FEATURES_KEY: &str = "features";
const COLORS_KEY: &str = "colors";
const RATING_KEY: &str = "rating";

/// Normalizes a raw [`StorefrontProduct`] into a [`Product`].
///
/// Defaults: price `0`, image [`PLACEHOLDER_IMAGE_URL`], tags empty,
/// inventory `0`, rating [`DEFAULT_REMOTE_RATING`].
#[must_use]
pub fn normalize_product(node: StorefrontProduct) -> Product {
    let variants: Vec<ProductVariant> = node
        .variants
        .as_ref()
        .map(|conn| {
            conn.nodes()
                .map(|v| normalize_variant(v, &node.id))
                .collect()
        })
        .unwrap_or_default();

    let images: Vec<ProductImage> = node
        .images
        .as_ref()
        .map(|conn| {
            conn.nodes()
                .map(|img| ProductImage {
                    url: img.url.clone(),
                    alt_text: img.alt_text.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let metafields: Vec<Metafield> = node
        .metafields
        .as_ref()
        .map(|conn| conn.nodes().map(to_metafield).collect())
        .unwrap_or_default();

    let price = variants.first().map_or(Decimal::ZERO, |v| v.price);
    let variant_id = variants.first().map(|v| v.id.clone());
    let image_url = images
        .first()
        .map(|img| img.url.trim())
        .filter(|url| !url.is_empty())
        .map_or_else(|| PLACEHOLDER_IMAGE_URL.to_string(), str::to_owned);

    let features = metafield_list(&metafields, FEATURES_KEY);
    let colors = metafield_list(&metafields, COLORS_KEY);
    let rating = metafield_rating(&metafields).unwrap_or(DEFAULT_REMOTE_RATING);

    let created_at = parse_timestamp(node.created_at.as_deref());
    let updated_at = parse_timestamp(node.updated_at.as_deref());

    Product {
        id: node.id,
        title: node.title,
        price,
        image_url,
        tags: node.tags,
        rating: Some(rating),
        features,
        colors,
        inventory: Some(node.total_inventory.unwrap_or(0)),
        variant_id,
        description: non_empty(node.description),
        vendor: non_empty(node.vendor),
        product_type: non_empty(node.product_type),
        created_at,
        updated_at,
        variants,
        images,
        metafields,
    }
}

fn normalize_variant(variant: &StorefrontVariant, product_id: &str) -> ProductVariant {
    let (price, currency_code) = match &variant.price {
        Some(money) => (
            parse_price(&money.amount, product_id),
            money.currency_code.clone(),
        ),
        None => (Decimal::ZERO, None),
    };
    ProductVariant {
        id: variant.id.clone(),
        title: variant.title.clone(),
        price,
        currency_code,
    }
}

fn to_metafield(raw: &StorefrontMetafield) -> Metafield {
    Metafield {
        namespace: raw.namespace.clone(),
        key: raw.key.clone(),
        value: raw.value.clone(),
    }
}

/// Parses a Storefront money amount. Unparsable or negative amounts become 0.
fn parse_price(amount: &str, product_id: &str) -> Decimal {
    match Decimal::from_str(amount.trim()) {
        Ok(price) if price.is_sign_negative() => {
            tracing::warn!(product_id, amount, "negative price clamped to zero");
            Decimal::ZERO
        }
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(product_id, amount, error = %e, "unparsable price, using zero");
            Decimal::ZERO
        }
    }
}

/// Lenient RFC 3339 parse; anything else is treated as absent.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Reads a list-valued metafield by `key` (any namespace).
///
/// Accepts a JSON string array (`list.single_line_text_field`) or plain text
/// separated by newlines or commas.
pub(crate) fn metafield_list(metafields: &[Metafield], key: &str) -> Vec<String> {
    let Some(field) = metafields.iter().find(|m| m.key.eq_ignore_ascii_case(key)) else {
        return Vec::new();
    };
    let value = field.value.trim();

    if value.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(value) {
            return clean(items.into_iter());
        }
    }

    clean(value.split(['\n', ',']).map(str::to_owned))
}

fn clean(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect()
}

fn metafield_rating(metafields: &[Metafield]) -> Option<f32> {
    let field = metafields.iter().find(|m| m.key.eq_ignore_ascii_case(RATING_KEY))?;
    let value = field.value.trim();
    // `rating` metafields are either a bare number or `{"value": "4.2", ...}`.
    let parsed = value.parse::<f32>().ok().or_else(|| {
        serde_json::from_str::<serde_json::Value>(value)
            .ok()
            .and_then(|json| match json.get("value")? {
                serde_json::Value::String(s) => s.parse::<f32>().ok(),
                #[allow(clippy::cast_possible_truncation)]
                serde_json::Value::Number(n) => n.as_f64().map(|f| f as f32),
                _ => None,
            })
    })?;
    (0.0..=5.0).contains(&parsed).then_some(parsed)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
