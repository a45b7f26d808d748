use axum::{
    Router,
    routing::post,
    Json,
    extract::{Multipart, State},
    response::Json as ResponseJson,
};
use bytes::Bytes;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::DatabaseOperations;
use crate::models::{AnalyzeResponse, AppState, DEFAULT_QUERY};
use crate::queue::AnalysisJob;
use crate::storage::DocumentGuard;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze/async", post(analyze_document_async))
        .with_state(state)
}

struct Upload {
    filename: String,
    data: Bytes,
}

/// Blank or missing queries fall back to the default investment question.
pub fn normalize_query(query: Option<String>) -> String {
    match query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q.to_string(),
        _ => DEFAULT_QUERY.to_string(),
    }
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::InvalidRequest(err.to_string())
}

/// Store the upload, record the job, and queue it for background analysis.
async fn analyze_document_async(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ResponseJson<AnalyzeResponse>> {
    let mut upload: Option<Upload> = None;
    let mut query: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field.bytes().await.map_err(bad_multipart)?;
                upload = Some(Upload { filename, data });
            }
            Some("query") => {
                query = Some(field.text().await.map_err(bad_multipart)?);
            }
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::InvalidRequest("missing 'file' field".to_string()))?;
    let query = normalize_query(query);

    let document = state.documents.save(&upload.data).await?;
    let job_id = Uuid::new_v4().to_string();

    // The record exists before the id is handed out, so a status lookup
    // can never race the worker.
    DatabaseOperations::create_record(&state.pool, &job_id, &upload.filename, &query).await?;

    let job = AnalysisJob {
        job_id: job_id.clone(),
        query,
        file_path: document.path.to_string_lossy().into_owned(),
        filename: upload.filename,
    };

    if let Err(e) = state.queue.enqueue(job).await {
        error!(job_id = %job_id, error = %e, "Failed to enqueue job");
        let _document = DocumentGuard::new(&document.path);
        DatabaseOperations::mark_failed(&state.pool, &job_id, &e.to_string()).await?;
        return Err(e);
    }

    info!(job_id = %job_id, size = upload.data.len(), "Analysis job queued");

    Ok(Json(AnalyzeResponse {
        message: "Analysis started in the background.".to_string(),
        check_status_url: format!("/status/{}", job_id),
        task_id: job_id,
    }))
}
