//! Operator directory endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResult, AppJson, Created};
use crate::errors::AppError;
use crate::models::{CreateOperatorRequest, Operator};
use crate::AppState;

/// Confirmation body returned by every delete.
pub const DELETED: &str = "Deleted";

/// GET /api/operators - List operators, newest first.
pub async fn list_operators(State(state): State<AppState>) -> ApiResult<Json<Vec<Operator>>> {
    let operators = state.repo.list_operators().await?;
    Ok(Json(operators))
}

/// POST /api/operators - Register an operator.
pub async fn create_operator(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOperatorRequest>,
) -> ApiResult<Created<Operator>> {
    let new_operator = request.normalize().map_err(AppError::Validation)?;

    let operator = state.repo.create_operator(&new_operator).await?;
    tracing::info!(
        operator_id = %operator.id,
        role = operator.role.as_str(),
        sub_district = %operator.sub_district,
        "operator registered"
    );
    Ok(Created(operator))
}

/// DELETE /api/operators/:id - Delete an operator.
///
/// Answers "Deleted" whether or not the operator existed.
pub async fn delete_operator(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<&'static str>> {
    let removed = state.repo.delete_operator(&id).await?;
    tracing::debug!(operator_id = %id, removed, "operator delete");
    Ok(Json(DELETED))
}
