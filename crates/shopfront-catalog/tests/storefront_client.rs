//! Integration tests for `StorefrontClient`, `BulkLoader`, and the catalog
//! fallback cascade.
//!
//! Uses `wiremock` to stand up a local GraphQL endpoint for each test so no
//! real network traffic is made.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopfront_catalog::{
    BulkLoader, BulkOptions, CatalogClient, CatalogError, ClientSettings, FallbackChain,
    LoadOutcome, MockSource, StorefrontClient, StorefrontSource,
};
use shopfront_core::{filter_mock_catalog, StorefrontCredentials};

const GRAPHQL_PATH: &str = "/api/2024-01/graphql.json";

fn credentials() -> StorefrontCredentials {
    StorefrontCredentials {
        shop_domain: "demo.myshopify.com".to_owned(),
        access_token: "test-token".to_owned(),
    }
}

/// Client with a short timeout and no retries.
fn test_client(server: &MockServer) -> StorefrontClient {
    test_client_with_retries(server, 0)
}

fn test_client_with_retries(server: &MockServer, max_retries: u32) -> StorefrontClient {
    let settings = ClientSettings {
        request_timeout_secs: 5,
        max_retries,
        retry_backoff_base_ms: 0,
    };
    StorefrontClient::with_endpoint(
        &credentials(),
        format!("{}{GRAPHQL_PATH}", server.uri()),
        settings,
    )
    .expect("failed to build test StorefrontClient")
}

fn node(id: usize) -> serde_json::Value {
    json!({
        "id": format!("gid://shopify/Product/{id}"),
        "title": format!("Product {id}"),
        "tags": ["demo"],
        "totalInventory": 3,
        "images": { "edges": [{ "node": { "url": format!("https://cdn.example.com/{id}.jpg"), "altText": null } }] },
        "variants": { "edges": [{ "node": { "id": format!("gid://shopify/ProductVariant/{id}"), "price": { "amount": "19.50", "currencyCode": "USD" } } }] },
        "metafields": { "edges": [] }
    })
}

/// A products page holding ids `first_id..first_id + count`.
fn page(first_id: usize, count: usize, has_next_page: bool, end_cursor: Option<&str>) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = (first_id..first_id + count)
        .map(|id| json!({ "cursor": format!("c{id}"), "node": node(id) }))
        .collect();
    json!({
        "data": {
            "products": {
                "edges": edges,
                "pageInfo": { "hasNextPage": has_next_page, "endCursor": end_cursor }
            }
        }
    })
}

fn loader(server: &MockServer, max_pages: usize) -> BulkLoader {
    BulkLoader::new(
        Some(test_client(server)),
        BulkOptions {
            max_pages,
            ..BulkOptions::default()
        },
    )
}

// ---------------------------------------------------------------------------
// Single-page search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_token_and_query_expression() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Storefront-Access-Token", "test-token"))
        .and(body_partial_json(json!({
            "variables": { "first": 12, "query": "title:*dress* OR tag:*dress*" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 2, false, None)))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .search_products("dress")
        .await
        .expect("search should succeed");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, "gid://shopify/Product/1");
    assert_eq!(products[0].price.to_string(), "19.50");
    assert_eq!(products[0].inventory, Some(3));
}

#[tokio::test]
async fn graphql_errors_surface_as_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Access denied" }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server).search_products("x").await.unwrap_err();
    assert!(
        matches!(&err, CatalogError::GraphQl(msg) if msg.contains("Access denied")),
        "expected GraphQl, got: {err:?}"
    );
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client_with_retries(&server, 3)
        .search_products("x")
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::UnexpectedStatus { status: 401, .. }));
}

#[tokio::test]
async fn throttled_request_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 1, false, None)))
        .mount(&server)
        .await;

    let products = test_client_with_retries(&server, 2)
        .search_products("x")
        .await
        .expect("retry should recover");
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).search_products("x").await.unwrap_err();
    assert!(matches!(err, CatalogError::Deserialize { .. }));
}

// ---------------------------------------------------------------------------
// Fallback cascade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_falls_back_to_mock_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let catalog = CatalogClient::with_chain(FallbackChain::new(vec![
        Box::new(StorefrontSource::new(test_client(&server))),
        Box::new(MockSource),
    ]));
    let result = catalog.search("leather").await;

    assert_eq!(result.source, Some("mock"));
    assert_eq!(result.products, filter_mock_catalog("leather"));
}

#[tokio::test]
async fn empty_live_result_falls_back_to_mock_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 0, false, None)))
        .mount(&server)
        .await;

    let catalog = CatalogClient::with_chain(FallbackChain::new(vec![
        Box::new(StorefrontSource::new(test_client(&server))),
        Box::new(MockSource),
    ]));
    let result = catalog.search("").await;

    assert_eq!(result.source, Some("mock"));
    assert_eq!(result.products.len(), shopfront_core::mock_catalog().len());
}

#[tokio::test]
async fn live_results_are_preferred_over_mock() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 3, false, None)))
        .mount(&server)
        .await;

    let catalog = CatalogClient::with_chain(FallbackChain::new(vec![
        Box::new(StorefrontSource::new(test_client(&server))),
        Box::new(MockSource),
    ]));
    let result = catalog.search("product").await;

    assert_eq!(result.source, Some("storefront"));
    assert_eq!(result.products.len(), 3);
}

// ---------------------------------------------------------------------------
// Bulk loader
// ---------------------------------------------------------------------------

/// Mounts the three-page 50 / 50 / 7 catalog.
async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "c50" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(51, 50, true, Some("c100"))))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "c100" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(101, 7, false, Some("c107"))))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "first": 50 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 50, true, Some("c50"))))
        .mount(server)
        .await;
}

#[tokio::test]
async fn bulk_load_follows_cursors_across_three_pages() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let load = loader(&server, 200).load_all().await;

    assert_eq!(load.outcome, LoadOutcome::Complete);
    assert_eq!(load.pages, 3);
    assert_eq!(load.products.len(), 107);
    assert_eq!(load.products[0].id, "gid://shopify/Product/1");
    assert_eq!(load.products[106].id, "gid://shopify/Product/107");
}

#[tokio::test]
async fn bulk_load_keeps_earlier_pages_when_a_page_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "c50" } })))
        .respond_with(ResponseTemplate::new(502))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 50, true, Some("c50"))))
        .mount(&server)
        .await;

    let load = loader(&server, 200).load_all().await;

    assert_eq!(load.products.len(), 50);
    assert_eq!(load.pages, 1);
    assert!(
        matches!(&load.outcome, LoadOutcome::Partial { error } if error.contains("502")),
        "expected Partial, got: {:?}",
        load.outcome
    );
}

#[tokio::test]
async fn bulk_load_stops_at_page_limit() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let load = loader(&server, 2).load_all().await;

    assert_eq!(load.pages, 2);
    assert_eq!(load.products.len(), 100);
    assert_eq!(load.outcome, LoadOutcome::PageLimit { max_pages: 2 });
}

#[tokio::test]
async fn bulk_load_stops_when_cursor_does_not_advance() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 5, true, None)))
        .mount(&server)
        .await;

    let load = loader(&server, 200).load_all().await;

    assert_eq!(load.pages, 1);
    assert_eq!(load.products.len(), 5);
    assert_eq!(load.outcome, LoadOutcome::CursorStalled);
}

#[tokio::test]
async fn bulk_load_stops_at_time_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(1, 5, true, Some("c5")))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let loader = BulkLoader::new(
        Some(test_client(&server)),
        BulkOptions {
            max_duration: Duration::from_millis(200),
            ..BulkOptions::default()
        },
    );
    let load = loader.load_all().await;

    assert_eq!(load.pages, 0);
    assert!(load.products.is_empty());
    assert_eq!(load.outcome, LoadOutcome::TimeLimit { max_duration_secs: 0 });
}

#[tokio::test]
async fn bulk_query_omits_descriptive_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1, 1, false, None)))
        .mount(&server)
        .await;

    loader(&server, 200).load_all().await;

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let document = body["query"].as_str().expect("query string");
    assert!(!document.contains("description"));
    assert!(!document.contains("productType"));
    assert!(!document.contains("metafields"));
    assert!(body["variables"].get("after").is_none());
}
