use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use crate::queue::{AnalysisJob, JobQueue, Worker};
use crate::types::{AppError, AppResult};

pub struct InMemoryQueue {
    sender: mpsc::UnboundedSender<AnalysisJob>,
}

impl InMemoryQueue {
    /// Spawn `concurrency` consumers sharing one channel.
    pub fn start(worker: Arc<Worker>, concurrency: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel::<AnalysisJob>();
        let receiver = Arc::new(Mutex::new(receiver));

        for consumer in 0..concurrency {
            let receiver = receiver.clone();
            let worker = worker.clone();
            tokio::spawn(async move {
                loop {
                    let next = receiver.lock().await.recv().await;
                    let Some(job) = next else { break };
                    debug!(consumer, job_id = %job.job_id, "Dequeued job");
                    worker.handle(job).await;
                }
                debug!(consumer, "Queue closed, consumer exiting");
            });
        }

        Self { sender }
    }
}

#[async_trait]
impl JobQueue for InMemoryQueue {
    async fn enqueue(&self, job: AnalysisJob) -> AppResult<()> {
        self.sender
            .send(job)
            .map_err(|_| AppError::Queue("in-process queue has shut down".to_string()))
    }

    fn backend(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::db::{test_pool, DatabaseOperations};
    use crate::llm::testing::ScriptedAdapter;
    use crate::models::JobStatus;
    use crate::pipeline::Pipeline;
    use crate::tools::ToolSet;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_enqueued_job_reaches_terminal_state() {
        let dir = TempDir::new().unwrap();
        let pool = test_pool().await;
        let tools = ToolSet::from_config(&SearchConfig {
            provider: "serper".to_string(),
            serper_api_key: String::new(),
            serpapi_key: String::new(),
            max_results: 4,
        });
        let adapter = ScriptedAdapter::new(["Final Answer: a", "Final Answer: b", "Final Answer: c", "Final Answer: d"]);
        let worker = Worker::new(pool.clone(), Arc::new(Pipeline::financial_analysis(adapter.llm(), &tools)));
        let queue = InMemoryQueue::start(Arc::new(worker), 1);

        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"x").unwrap();
        DatabaseOperations::create_record(&pool, "job-q", "doc.pdf", "q").await.unwrap();
        queue
            .enqueue(AnalysisJob {
                job_id: "job-q".to_string(),
                query: "q".to_string(),
                file_path: path.to_string_lossy().into_owned(),
                filename: "doc.pdf".to_string(),
            })
            .await
            .unwrap();

        let mut status = JobStatus::Processing;
        for _ in 0..100 {
            status = DatabaseOperations::get_record(&pool, "job-q").await.unwrap().unwrap().status;
            if status.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(status, JobStatus::Completed);
        assert_eq!(queue.backend(), "in-memory");
    }
}
