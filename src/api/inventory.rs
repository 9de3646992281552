//! Inventory endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, AppJson, Created};
use crate::models::{AddItemRequest, AdjustStockRequest, InventoryItem};
use crate::AppState;

/// GET /api/inventory
pub async fn list_inventory(State(state): State<AppState>) -> Json<Vec<InventoryItem>> {
    Json(state.dispatch.inventory().await)
}

/// POST /api/inventory - Add a new item.
pub async fn add_item(
    State(state): State<AppState>,
    AppJson(request): AppJson<AddItemRequest>,
) -> ApiResult<Created<InventoryItem>> {
    Ok(Created(state.dispatch.add_item(request).await?))
}

/// POST /api/inventory/:id/adjust - Change stock by a signed amount, floored at zero.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    AppJson(request): AppJson<AdjustStockRequest>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(state.dispatch.adjust_stock(id, request.amount).await?))
}
