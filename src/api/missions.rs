//! Mission endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::models::{Mission, RequestView};
use crate::AppState;

/// GET /api/missions - Active missions (zero or one).
pub async fn list_missions(State(state): State<AppState>) -> Json<Vec<Mission>> {
    Json(state.dispatch.active_missions().await)
}

/// POST /api/missions/:id/complete - Report arrival of the mission for request `id`.
pub async fn complete_mission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RequestView>> {
    Ok(Json(state.dispatch.complete_delivery(&id).await?))
}
