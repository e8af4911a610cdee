mod assistant;
mod cart;
mod inventory;
mod products;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_catalog::{BulkLoader, CatalogClient, InventoryStats, InventoryStore};
use shopfront_stylist::{Assistant, OutfitClient};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogClient>,
    pub inventory: Arc<InventoryStore>,
    pub loader: Arc<BulkLoader>,
    pub assistant: Arc<Assistant>,
    /// `None` when no outfit completion service is configured.
    pub outfits: Option<Arc<OutfitClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    catalog: &'static str,
    answer_mode: String,
    inventory: InventoryStats,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "inventory_empty" | "inventory_incomplete" | "missing_credentials" => {
                StatusCode::CONFLICT
            }
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "load_failed" | "upstream_error" => StatusCode::BAD_GATEWAY,
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/products", get(products::search_products))
        .route("/api/v1/inventory/stats", get(inventory::inventory_stats))
        .route("/api/v1/inventory/reload", post(inventory::reload_inventory))
        .route("/api/v1/inventory/search", get(inventory::search_inventory))
        .route(
            "/api/v1/inventory/categories",
            get(inventory::list_categories),
        )
        .route(
            "/api/v1/inventory/categories/{label}",
            get(inventory::products_by_category),
        )
        .route("/api/v1/inventory/tags", get(inventory::list_tags))
        .route(
            "/api/v1/inventory/tags/{label}",
            get(inventory::products_by_tag),
        )
        .route("/api/v1/cart/subtotal", post(cart::cart_subtotal))
        .route("/api/v1/answer", post(assistant::answer))
        .route("/api/v1/recommendations", post(assistant::recommend))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            catalog: if state.catalog.is_live() {
                "live"
            } else {
                "mock"
            },
            answer_mode: state.assistant.mode().to_string(),
            inventory: state.inventory.stats(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
