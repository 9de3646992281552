//! Activity log endpoint.

use axum::{extract::State, Json};

use crate::models::ActivityEntry;
use crate::AppState;

/// GET /api/activity - Recent activity, newest first.
pub async fn list_activity(State(state): State<AppState>) -> Json<Vec<ActivityEntry>> {
    Json(state.dispatch.activity().await)
}
