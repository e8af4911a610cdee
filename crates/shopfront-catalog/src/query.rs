//! GraphQL documents and variables for the Storefront `products` connection.

use serde::Serialize;

/// Fields shared by every product query: id, title, tags, inventory, first
/// image and first variant.
const PRODUCT_CARD_FRAGMENT: &str = r"
fragment ProductCard on Product {
  id
  title
  tags
  totalInventory
  createdAt
  updatedAt
  images(first: 1) { edges { node { url altText } } }
  variants(first: 1) { edges { node { id title price { amount currencyCode } } } }
}
";

/// Single-page search used by the interactive catalog. Asks for the extended
/// descriptive fields and up to ten metafields on top of the product card.
pub const SEARCH_PRODUCTS_QUERY: &str = r"
query SearchProducts($first: Int!, $query: String) {
  products(first: $first, query: $query) {
    edges {
      cursor
      node {
        ...ProductCard
        description
        vendor
        productType
        metafields(first: 10) { edges { node { namespace key value } } }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}
";

/// Cursor-paged listing used by the bulk loader. Omits description, vendor,
/// product type and metafields to keep each page small.
pub const LIST_PRODUCTS_QUERY: &str = r"
query ListProducts($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    edges { cursor node { ...ProductCard } }
    pageInfo { hasNextPage endCursor }
  }
}
";

/// Request body posted to the GraphQL endpoint.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: String,
    pub variables: ProductsVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct ProductsVariables<'a> {
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl<'a> GraphQlRequest<'a> {
    /// Search request for `search_text`, page size `first`.
    #[must_use]
    pub fn search(search_text: &str, first: u32) -> Self {
        Self {
            query: with_fragment(SEARCH_PRODUCTS_QUERY),
            variables: ProductsVariables {
                first,
                after: None,
                query: Some(search_expression(search_text)),
            },
        }
    }

    /// Listing request for one bulk page, continuing from `after`.
    #[must_use]
    pub fn list(first: u32, after: Option<&'a str>) -> Self {
        Self {
            query: with_fragment(LIST_PRODUCTS_QUERY),
            variables: ProductsVariables {
                first,
                after,
                query: None,
            },
        }
    }
}

fn with_fragment(document: &str) -> String {
    format!("{document}{PRODUCT_CARD_FRAGMENT}")
}

/// Storefront search expression for a free-text query.
///
/// `"dress"` becomes `title:*dress* OR tag:*dress*`; an empty or
/// whitespace-only query becomes the empty string (match everything).
#[must_use]
pub fn search_expression(query: &str) -> String {
    let q = query.trim();
    if q.is_empty() {
        String::new()
    } else {
        format!("title:*{q}* OR tag:*{q}*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_expression_wraps_query_in_wildcards() {
        assert_eq!(search_expression("dress"), "title:*dress* OR tag:*dress*");
    }

    #[test]
    fn search_expression_trims_and_handles_empty() {
        assert_eq!(search_expression("  boots "), "title:*boots* OR tag:*boots*");
        assert_eq!(search_expression(""), "");
        assert_eq!(search_expression("   "), "");
    }

    #[test]
    fn search_request_serializes_variables() {
        let request = GraphQlRequest::search("silk", 12);
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["variables"]["first"], 12);
        assert_eq!(json["variables"]["query"], "title:*silk* OR tag:*silk*");
        assert!(json["variables"].get("after").is_none());
        assert!(json["query"]
            .as_str()
            .is_some_and(|q| q.contains("fragment ProductCard")
                && q.contains("description")
                && q.contains("metafields(first: 10)")));
    }

    #[test]
    fn list_request_omits_descriptive_fields() {
        let request = GraphQlRequest::list(50, Some("cursor-1"));
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["variables"]["first"], 50);
        assert_eq!(json["variables"]["after"], "cursor-1");
        assert!(json["variables"].get("query").is_none());

        let document = json["query"].as_str().expect("query string");
        assert!(!document.contains("description"));
        assert!(!document.contains("vendor"));
        assert!(!document.contains("productType"));
        assert!(!document.contains("metafields"));
    }

    #[test]
    fn list_request_first_page_has_no_cursor() {
        let request = GraphQlRequest::list(50, None);
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json["variables"].get("after").is_none());
    }
}
