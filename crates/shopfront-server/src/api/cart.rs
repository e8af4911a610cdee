use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{
    cart_lines, cart_subtotal as subtotal_of, Cart, CartError, CartLine, Product,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SubtotalRequest {
    pub cart: Cart,
    /// Prices to resolve against. Defaults to the current inventory.
    #[serde(default)]
    pub products: Option<Vec<Product>>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubtotalData {
    subtotal: Decimal,
    item_count: u64,
    lines: Vec<CartLine>,
}

pub(super) async fn cart_subtotal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<SubtotalRequest>,
) -> Result<Json<ApiResponse<SubtotalData>>, ApiError> {
    let summary = match &request.products {
        Some(products) => summarize(products, &request.cart),
        None => summarize(state.inventory.snapshot().products(), &request.cart),
    };
    let data = summary
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn summarize(products: &[Product], cart: &Cart) -> Result<SubtotalData, CartError> {
    Ok(SubtotalData {
        subtotal: subtotal_of(products, cart)?,
        item_count: cart.item_count(),
        lines: cart_lines(products, cart)?,
    })
}
