// Financial Document Analyzer - asynchronous multi-agent analysis of uploaded financial reports

pub mod config;
pub mod db;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod tools;     // Agent tools (web search, PDF reader, text cleanup, risk stub)
pub mod pipeline;  // Four-step task graph and its orchestrator
pub mod storage;
pub mod routes;
pub mod middleware;
pub mod queue;

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

use crate::llm::LLM;
use crate::pipeline::Pipeline;
use crate::queue::Worker;
use crate::storage::DocumentStore;
use crate::tools::ToolSet;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

/// Wire the LLM, tools, pipeline and job queue into the shared state.
/// Queue consumers are spawned here, so this must run inside a tokio runtime.
pub async fn build_state(config: Config, pool: SqlitePool) -> anyhow::Result<AppState> {
    let llm = LLM::from_config(&config.llm)?;
    info!(provider = %config.llm.provider, model = %llm.model(), "LLM configured");

    let tools = ToolSet::from_config(&config.search);
    let pipeline = Arc::new(Pipeline::financial_analysis(llm, &tools));

    let worker = Worker::new(pool.clone(), pipeline);
    let queue = queue::start(&config.queue, worker).await?;

    let documents = DocumentStore::new(&config.storage.upload_dir);

    Ok(AppState {
        pool,
        config,
        documents,
        queue,
    })
}
