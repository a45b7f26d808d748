use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, MultiplexedConnection};
use redis::AsyncCommands;
use tracing::{debug, error, warn};

use crate::queue::{AnalysisJob, JobQueue, Worker};
use crate::types::{AppError, AppResult};

pub const QUEUE_KEY: &str = "findoc:jobs";

/// BRPOP timeout, so idle consumers periodically re-check their connection.
const POP_TIMEOUT_SECS: f64 = 5.0;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

pub struct RedisQueue {
    manager: ConnectionManager,
}

impl RedisQueue {
    pub async fn start(url: &str, worker: Arc<Worker>, concurrency: usize) -> AppResult<Self> {
        let client = redis::Client::open(url)?;
        let manager = client.get_connection_manager().await?;

        for consumer in 0..concurrency {
            let client = client.clone();
            let worker = worker.clone();
            tokio::spawn(async move { consume(client, worker, consumer).await });
        }

        Ok(Self { manager })
    }
}

pub fn encode_job(job: &AnalysisJob) -> AppResult<String> {
    serde_json::to_string(job).map_err(|e| AppError::Queue(format!("failed to encode job: {}", e)))
}

pub fn decode_job(payload: &str) -> AppResult<AnalysisJob> {
    serde_json::from_str(payload).map_err(|e| AppError::Queue(format!("failed to decode job: {}", e)))
}

/// Blocking consumers need their own connection; BRPOP would stall every
/// other command sharing a multiplexed one.
async fn consume(client: redis::Client, worker: Arc<Worker>, consumer: usize) {
    let mut connection: Option<MultiplexedConnection> = None;

    loop {
        if connection.is_none() {
            match client.get_multiplexed_async_connection().await {
                Ok(conn) => connection = Some(conn),
                Err(e) => {
                    warn!(consumer, error = %e, "Redis connection failed, retrying");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            }
        }
        let Some(conn) = connection.as_mut() else { continue };

        let result: redis::RedisResult<Option<(String, String)>> =
            conn.brpop(QUEUE_KEY, POP_TIMEOUT_SECS).await;
        let popped = match result {
            Ok(popped) => popped,
            Err(e) => {
                warn!(consumer, error = %e, "BRPOP failed, reconnecting");
                connection = None;
                tokio::time::sleep(RECONNECT_DELAY).await;
                continue;
            }
        };

        let Some((_, payload)) = popped else { continue };
        match decode_job(&payload) {
            Ok(job) => {
                debug!(consumer, job_id = %job.job_id, "Dequeued job");
                worker.handle(job).await;
            }
            Err(e) => error!(consumer, error = %e, "Discarding malformed job payload"),
        }
    }
}

#[async_trait]
impl JobQueue for RedisQueue {
    async fn enqueue(&self, job: AnalysisJob) -> AppResult<()> {
        let payload = encode_job(&job)?;
        let mut conn = self.manager.clone();
        conn.lpush::<_, _, ()>(QUEUE_KEY, payload).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
