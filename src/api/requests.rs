//! Supply request endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::{ApiResult, AppJson, Created};
use crate::models::{
    CreateSupplyRequest, DispatchRequest, Mission, RequestView, SendChatRequest,
};
use crate::AppState;

/// GET /api/requests - List requests, newest first.
pub async fn list_requests(State(state): State<AppState>) -> Json<Vec<RequestView>> {
    Json(state.dispatch.list_requests().await)
}

/// POST /api/requests - File a new supply request.
pub async fn create_request(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSupplyRequest>,
) -> ApiResult<Created<RequestView>> {
    let created = state.dispatch.create_request(request).await?;
    Ok(Created(created))
}

/// GET /api/requests/:id - Get a single request.
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RequestView>> {
    Ok(Json(state.dispatch.get_request(&id).await?))
}

/// POST /api/requests/:id/approve
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RequestView>> {
    Ok(Json(state.dispatch.approve(&id).await?))
}

/// POST /api/requests/:id/reject
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RequestView>> {
    Ok(Json(state.dispatch.reject(&id).await?))
}

/// POST /api/requests/:id/dispatch - Launch a mission; body must carry `{"confirm": true}`.
pub async fn dispatch_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Option<Json<DispatchRequest>>, JsonRejection>,
) -> ApiResult<Json<Mission>> {
    let confirm = body?.map(|Json(b)| b.confirm).unwrap_or(false);
    Ok(Json(state.dispatch.dispatch(&id, confirm).await?))
}

/// POST /api/requests/:id/chat - Append a chat message.
pub async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(chat): AppJson<SendChatRequest>,
) -> ApiResult<Json<RequestView>> {
    Ok(Json(state.dispatch.append_chat(&id, chat).await?))
}
