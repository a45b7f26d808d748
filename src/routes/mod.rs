//! API Routes
//!
//! - `GET /` - Liveness message
//! - `GET /health` - Database and queue status
//! - `POST /analyze/async` - Upload a document and queue its analysis
//! - `GET /status/{task_id}` - Poll a job

pub mod analyze;
pub mod health;
pub mod status;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let body_limit = state.config.server.max_upload_bytes;
    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(health::router(state.clone()))
        .merge(analyze::router(state.clone()))
        .merge(status::router(state))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
