use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use shopfront_core::Product;
use shopfront_stylist::{Answer, Language, OutfitRecommendation, StylistError};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnswerRequest {
    pub prompt: String,
    #[serde(default)]
    pub lang: Option<String>,
    /// Catalog search to answer from instead of the loaded inventory.
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub budget: Option<Decimal>,
}

/// Products an answer is drawn from: an explicit search, else the loaded
/// inventory, else the unfiltered catalog.
async fn answer_products(state: &AppState, query: Option<&str>) -> Vec<Product> {
    if let Some(query) = query {
        return state.catalog.search_products(query.trim()).await;
    }
    let index = state.inventory.snapshot();
    if index.is_empty() {
        state.catalog.search_products("").await
    } else {
        index.products().to_vec()
    }
}

pub(super) async fn answer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<ApiResponse<Answer>>, ApiError> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "prompt must not be empty"));
    }

    let lang = request
        .lang
        .as_deref()
        .map(Language::from_tag)
        .unwrap_or_default();
    let products = answer_products(&state, request.query.as_deref()).await;
    let data = state.assistant.answer(&request.prompt, &products, lang).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn recommend(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<ApiResponse<OutfitRecommendation>>, ApiError> {
    let Some(outfits) = state.outfits.as_ref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "no outfit completion service is configured",
        ));
    };

    let (index, outcome) = state.inventory.current();
    if index.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "inventory_empty",
            "inventory has not been loaded",
        ));
    }
    if let Some(outcome) = outcome.filter(|o| !o.is_complete()) {
        return Err(ApiError::new(
            req_id.0,
            "inventory_incomplete",
            format!("inventory load did not complete: {outcome}"),
        ));
    }

    let data = outfits
        .recommend(&request.query, index.products(), request.budget)
        .await
        .map_err(|e| match e {
            StylistError::EmptyCatalog => {
                ApiError::new(req_id.0.clone(), "inventory_empty", e.to_string())
            }
            other => {
                tracing::error!(error = %other, "outfit recommendation failed");
                ApiError::new(req_id.0.clone(), "upstream_error", other.to_string())
            }
        })?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
