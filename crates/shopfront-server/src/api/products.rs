use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use shopfront_catalog::SourcedProducts;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Always answers: the fallback chain ends in the mock catalog.
pub(super) async fn search_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiResponse<SourcedProducts>> {
    let data = state.catalog.search(query.q.trim()).await;

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{get, offline_state, send};

    #[tokio::test]
    async fn empty_query_returns_whole_mock_catalog() {
        let (status, json) = send(offline_state(), get("/api/v1/products")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["source"], "mock");
        assert_eq!(
            json["data"]["products"].as_array().map(Vec::len),
            Some(shopfront_core::mock_catalog().len())
        );
    }

    #[tokio::test]
    async fn query_filters_mock_catalog() {
        let (status, json) = send(offline_state(), get("/api/v1/products?q=accessor")).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = json["data"]["products"]
            .as_array()
            .expect("products array")
            .iter()
            .filter_map(|p| p["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["mock-leather-tote", "mock-gold-hoops"]);
    }
}
