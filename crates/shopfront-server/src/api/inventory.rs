use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopfront_catalog::{InventoryError, InventoryStats, ReloadReport};
use shopfront_core::Product;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct InventorySearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub(super) struct LabelCount {
    label: String,
    count: usize,
}

fn map_inventory_error(request_id: String, error: &InventoryError) -> ApiError {
    match error {
        InventoryError::MissingCredentials => {
            ApiError::new(request_id, "missing_credentials", error.to_string())
        }
        InventoryError::LoadFailed(_) => {
            tracing::error!(error = %error, "inventory reload failed");
            ApiError::new(request_id, "load_failed", error.to_string())
        }
    }
}

fn label_counts(counts: Vec<(&str, usize)>) -> Vec<LabelCount> {
    counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_owned(),
            count,
        })
        .collect()
}

pub(super) async fn inventory_stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<InventoryStats>> {
    Json(ApiResponse {
        data: state.inventory.stats(),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn reload_inventory(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ReloadReport>>, ApiError> {
    let report = state
        .inventory
        .reload(&state.loader)
        .await
        .map_err(|e| map_inventory_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn search_inventory(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<InventorySearchQuery>,
) -> Json<ApiResponse<Vec<Product>>> {
    let index = state.inventory.snapshot();
    let data = index
        .search_by_text(&query.q)
        .into_iter()
        .cloned()
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<LabelCount>>> {
    let index = state.inventory.snapshot();
    Json(ApiResponse {
        data: label_counts(index.category_counts()),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn products_by_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(label): Path<String>,
) -> Json<ApiResponse<Vec<Product>>> {
    let index = state.inventory.snapshot();
    let data = index.by_category(&label).into_iter().cloned().collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_tags(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<LabelCount>>> {
    let index = state.inventory.snapshot();
    Json(ApiResponse {
        data: label_counts(index.tag_counts()),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn products_by_tag(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(label): Path<String>,
) -> Json<ApiResponse<Vec<Product>>> {
    let index = state.inventory.snapshot();
    let data = index.by_tag(&label).into_iter().cloned().collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use shopfront_catalog::{
        BulkLoader, BulkOptions, ClientSettings, InventoryStore, StorefrontClient,
    };
    use shopfront_core::{mock_catalog, StorefrontCredentials};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::test_support::{get, offline_state, send};
    use super::super::AppState;

    async fn loaded_state() -> AppState {
        let state = offline_state();
        state.inventory.rebuild(mock_catalog().to_vec()).await;
        state
    }

    fn post(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn ids(json: &serde_json::Value) -> Vec<String> {
        json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .filter_map(|p| p["id"].as_str().map(str::to_owned))
            .collect()
    }

    #[tokio::test]
    async fn stats_of_unloaded_inventory_are_empty() {
        let (status, json) = send(offline_state(), get("/api/v1/inventory/stats")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total_products"], 0);
        assert_eq!(json["data"]["cache_size"], 0);
        assert_eq!(json["data"]["is_loading"], false);
        assert!(json["data"]["last_updated"].is_null());
        assert!(json["data"]["last_outcome"].is_null());
    }

    #[tokio::test]
    async fn stats_reflect_rebuilt_index() {
        let (_, json) = send(loaded_state().await, get("/api/v1/inventory/stats")).await;

        assert_eq!(json["data"]["total_products"], mock_catalog().len());
        assert_eq!(json["data"]["cache_size"], mock_catalog().len());
        assert!(json["data"]["last_updated"].is_string());
        assert_eq!(json["data"]["last_outcome"]["status"], "complete");
    }

    #[tokio::test]
    async fn search_matches_inventory_text() {
        let (status, json) =
            send(loaded_state().await, get("/api/v1/inventory/search?q=silk")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&json), vec!["mock-silk-camisole"]);
    }

    #[tokio::test]
    async fn tag_lookup_is_exact_and_unknown_is_empty() {
        let state = loaded_state().await;

        let (_, json) = send(state.clone(), get("/api/v1/inventory/tags/accessories")).await;
        assert_eq!(ids(&json), vec!["mock-leather-tote", "mock-gold-hoops"]);

        let (status, json) = send(state, get("/api/v1/inventory/tags/nonexistent")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }

    #[tokio::test]
    async fn category_lookup_for_unknown_label_is_empty() {
        let (status, json) = send(
            loaded_state().await,
            get("/api/v1/inventory/categories/spaceships"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }

    #[tokio::test]
    async fn category_list_counts_every_product() {
        let (_, json) = send(loaded_state().await, get("/api/v1/inventory/categories")).await;

        let total: u64 = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .filter_map(|c| c["count"].as_u64())
            .sum();
        assert_eq!(total, mock_catalog().len() as u64);
    }

    #[tokio::test]
    async fn reload_without_credentials_is_conflict() {
        let (status, json) = send(offline_state(), post("/api/v1/inventory/reload")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "missing_credentials");
    }

    #[tokio::test]
    async fn reload_fetches_and_publishes_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "products": {
                    "edges": [{
                        "cursor": "c1",
                        "node": {
                            "id": "gid://shopify/Product/1",
                            "title": "Canvas Sneaker",
                            "tags": ["shoes"],
                            "totalInventory": 4,
                            "images": { "edges": [] },
                            "variants": { "edges": [{ "node": {
                                "id": "gid://shopify/ProductVariant/11",
                                "price": { "amount": "65.00", "currencyCode": "USD" }
                            } }] }
                        }
                    }],
                    "pageInfo": { "hasNextPage": false, "endCursor": "c1" }
                }}
            })))
            .mount(&server)
            .await;

        let creds = StorefrontCredentials {
            shop_domain: "demo.myshopify.com".to_owned(),
            access_token: "token".to_owned(),
        };
        let client = StorefrontClient::with_endpoint(
            &creds,
            format!("{}/graphql.json", server.uri()),
            ClientSettings::default(),
        )
        .expect("client");
        let state = AppState {
            loader: Arc::new(BulkLoader::new(Some(client), BulkOptions::default())),
            inventory: Arc::new(InventoryStore::new()),
            ..offline_state()
        };

        let (status, json) = send(state.clone(), post("/api/v1/inventory/reload")).await;

        assert_eq!(status, StatusCode::OK, "{json}");
        assert_eq!(json["data"]["stats"]["cache_size"], 1);
        assert_eq!(json["data"]["outcome"]["status"], "complete");
        assert_eq!(state.inventory.stats().total_products, 1);
    }
}
