//! Background Job Queue
//!
//! Submitted documents become [`AnalysisJob`]s that a pool of worker tasks
//! consumes. Two brokers are available:
//!
//! - **In-process** (default): a tokio channel; jobs are lost on restart
//! - **Redis** (`USE_JOB_QUEUE=true`): JSON payloads on a Redis list, so
//!   several server processes can share the work

pub mod jobs;
pub mod memory;
pub mod redis_queue;
pub mod workers;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::QueueConfig;
use crate::types::AppResult;

pub use jobs::AnalysisJob;
pub use memory::InMemoryQueue;
pub use redis_queue::RedisQueue;
pub use workers::Worker;

#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: AnalysisJob) -> AppResult<()>;

    /// Short backend name, reported by the health endpoint
    fn backend(&self) -> &'static str;
}

/// Build the configured broker and spawn its consumers.
pub async fn start(config: &QueueConfig, worker: Worker) -> AppResult<Arc<dyn JobQueue>> {
    let worker = Arc::new(worker.with_timeout(config.job_timeout_secs.map(Duration::from_secs)));
    let concurrency = config.worker_concurrency.max(1);

    let queue: Arc<dyn JobQueue> = if config.redis_enabled {
        Arc::new(RedisQueue::start(&config.redis_url, worker, concurrency).await?)
    } else {
        Arc::new(InMemoryQueue::start(worker, concurrency))
    };

    info!(backend = queue.backend(), workers = concurrency, "Job queue started");
    Ok(queue)
}
