use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db::DatabaseOperations;
use crate::models::JobStatus;
use crate::pipeline::{Pipeline, TaskInputs};
use crate::queue::jobs::AnalysisJob;
use crate::storage::DocumentGuard;
use crate::types::{AppError, AppResult};

/// Executes analysis jobs: one pipeline run per job, one terminal write.
pub struct Worker {
    pool: SqlitePool,
    pipeline: Arc<Pipeline>,
    timeout: Option<Duration>,
}

impl Worker {
    pub fn new(pool: SqlitePool, pipeline: Arc<Pipeline>) -> Self {
        Self {
            pool,
            pipeline,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Entry point for queue consumers; errors are logged, never returned.
    pub async fn handle(&self, job: AnalysisJob) {
        let job_id = job.job_id.clone();
        match self.process_job(job).await {
            Ok(status) => info!(job_id = %job_id, status = %status, "Job finished"),
            Err(e) => error!(job_id = %job_id, error = %e, "Job could not be recorded"),
        }
    }

    pub async fn process_job(&self, job: AnalysisJob) -> AppResult<JobStatus> {
        // Dropped on every return path below, including panics inside the pipeline
        let _document = DocumentGuard::new(&job.file_path);

        info!(job_id = %job.job_id, filename = %job.filename, "Processing analysis job");

        if DatabaseOperations::ensure_record(&self.pool, &job.job_id, &job.filename, &job.query).await? {
            warn!(job_id = %job.job_id, "Job had no record at dequeue time, created one");
        }

        let inputs = TaskInputs::new(job.query.as_str(), job.file_path.as_str());
        let status = match self.run_pipeline(&inputs).await {
            Ok(result) => {
                DatabaseOperations::mark_completed(&self.pool, &job.job_id, &result).await?;
                JobStatus::Completed
            }
            Err(description) => {
                warn!(job_id = %job.job_id, error = %description, "Pipeline failed");
                DatabaseOperations::mark_failed(&self.pool, &job.job_id, &description).await?;
                JobStatus::Failed
            }
        };

        Ok(status)
    }

    /// Run the pipeline, folding errors, panics and timeouts into a failure
    /// description.
    async fn run_pipeline(&self, inputs: &TaskInputs) -> Result<String, String> {
        let run = AssertUnwindSafe(self.pipeline.run(inputs)).catch_unwind();

        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    return Err(AppError::Pipeline(format!(
                        "job timed out after {} seconds",
                        limit.as_secs()
                    ))
                    .to_string());
                }
            },
            None => run.await,
        };

        match outcome {
            Ok(Ok(run)) => Ok(run.final_output().to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic_message(panic)),
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("Pipeline panicked: {}", detail)
}
