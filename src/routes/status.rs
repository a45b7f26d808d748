use axum::{
    Router,
    routing::get,
    Json,
    extract::{State, Path},
    response::Json as ResponseJson,
};
use tracing::debug;

use crate::db::DatabaseOperations;
use crate::models::{AppState, StatusResponse};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status/{task_id}", get(get_task_status))
        .with_state(state)
}

async fn get_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<ResponseJson<StatusResponse>> {
    let record = DatabaseOperations::get_record(&state.pool, &task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    debug!(task_id = %task_id, status = %record.status, "Status lookup");
    Ok(Json(StatusResponse::from(record)))
}
