use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::queue::JobQueue;
use crate::storage::DocumentStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub documents: DocumentStore,
    pub queue: Arc<dyn JobQueue>,
}

/// Lifecycle of an analysis job. `Processing` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct AnalysisRecord {
    pub id: String,
    pub filename: String,
    pub query: String,
    pub status: JobStatus,
    pub result_text: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// API Request/Response types

pub const DEFAULT_QUERY: &str = "Analyze this financial document for investment insights";

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct AnalyzeResponse {
    pub message: String,
    pub task_id: String,
    pub check_status_url: String,
}

/// Status payload. Completed jobs carry filename/query/result, everything else
/// carries a progress message.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AnalysisRecord> for StatusResponse {
    fn from(record: AnalysisRecord) -> Self {
        match record.status {
            JobStatus::Completed => Self {
                status: record.status,
                filename: Some(record.filename),
                query: Some(record.query),
                result: record.result_text,
                message: None,
            },
            JobStatus::Failed => Self {
                status: record.status,
                filename: None,
                query: None,
                result: record.result_text,
                message: Some("The analysis failed.".to_string()),
            },
            JobStatus::Processing => Self {
                status: record.status,
                filename: None,
                query: None,
                result: None,
                message: Some("The AI is currently analyzing the document.".to_string()),
            },
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
    pub queue: String,
}
