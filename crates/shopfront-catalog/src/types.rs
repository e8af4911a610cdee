//! Response types for the Shopify Storefront GraphQL `products` connection.
//!
//! ## Observed shape
//!
//! ### Envelope
//! Every response is `{ "data": ..., "errors": [...] }`. A query-level failure
//! (bad token scope, throttling, syntax) can still come back as HTTP 200 with
//! `data: null` and a non-empty `errors` array, so both halves are optional.
//!
//! ### Money
//! `price.amount` is a decimal **string** (`"89.99"`), never a JSON number.
//! Parsing to `Decimal` happens in `normalize.rs`.
//!
//! ### Connections
//! `images`, `variants` and `metafields` are Relay connections
//! (`{ edges: [{ node }] }`). Any of them may be absent when not requested,
//! which is how the bulk query keeps its pages small.
//!
//! ### Timestamps
//! `createdAt`/`updatedAt` are ISO-8601 strings. Kept as strings here so a
//! single odd value cannot fail the whole page; parsed leniently later.

use serde::{Deserialize, Serialize};

/// Top-level GraphQL envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` payload of both product queries.
#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: ProductConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    #[serde(default)]
    pub edges: Vec<Edge<StorefrontProduct>>,
    #[serde(default)]
    pub page_info: PageInfo,
}

/// Relay pagination block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    #[serde(default)]
    pub cursor: Option<String>,
    pub node: T,
}

/// A product node as returned by the Storefront API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProduct {
    /// Global ID, e.g. `"gid://shopify/Product/7982301"`.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Summed across variants. `null` when inventory is not tracked.
    #[serde(default)]
    pub total_inventory: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// May be an empty string; treated as absent during normalization.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub images: Option<Connection<StorefrontImage>>,
    #[serde(default)]
    pub variants: Option<Connection<StorefrontVariant>>,
    #[serde(default)]
    pub metafields: Option<Connection<StorefrontMetafield>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontVariant {
    /// Global ID, e.g. `"gid://shopify/ProductVariant/4410"`.
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    #[serde(default)]
    pub currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StorefrontMetafield {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

impl<T> Connection<T> {
    /// Nodes in edge order.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_full_products_page() {
        let body = serde_json::json!({
            "data": {
                "products": {
                    "edges": [{
                        "cursor": "c1",
                        "node": {
                            "id": "gid://shopify/Product/1",
                            "title": "Linen Shirt",
                            "tags": ["linen", "summer"],
                            "totalInventory": 8,
                            "images": { "edges": [{ "node": { "url": "https://cdn.example.com/a.jpg", "altText": null } }] },
                            "variants": { "edges": [{ "node": { "id": "gid://shopify/ProductVariant/11", "price": { "amount": "45.00", "currencyCode": "USD" } } }] },
                            "metafields": { "edges": [{ "node": { "namespace": "custom", "key": "features", "value": "[\"Breathable\"]" } }] }
                        }
                    }],
                    "pageInfo": { "hasNextPage": true, "endCursor": "c1" }
                }
            }
        });

        let parsed: GraphQlResponse<ProductsData> =
            serde_json::from_value(body).expect("should deserialize");
        let connection = parsed.data.expect("data present").products;
        assert_eq!(connection.edges.len(), 1);
        assert!(connection.page_info.has_next_page);
        assert_eq!(connection.page_info.end_cursor.as_deref(), Some("c1"));

        let node = &connection.edges[0].node;
        assert_eq!(node.total_inventory, Some(8));
        let variant = node
            .variants
            .as_ref()
            .and_then(|v| v.nodes().next())
            .expect("variant present");
        assert_eq!(
            variant.price.as_ref().map(|m| m.amount.as_str()),
            Some("45.00")
        );
    }

    #[test]
    fn deserializes_minimal_node() {
        let node: StorefrontProduct = serde_json::from_value(serde_json::json!({
            "id": "gid://shopify/Product/2",
            "title": "Bare"
        }))
        .expect("should deserialize");
        assert!(node.tags.is_empty());
        assert!(node.images.is_none());
        assert!(node.variants.is_none());
        assert!(node.total_inventory.is_none());
    }

    #[test]
    fn deserializes_error_envelope_without_data() {
        let parsed: GraphQlResponse<ProductsData> = serde_json::from_value(serde_json::json!({
            "errors": [{ "message": "Throttled" }]
        }))
        .expect("should deserialize");
        assert!(parsed.data.is_none());
        assert_eq!(parsed.errors[0].message, "Throttled");
    }
}
