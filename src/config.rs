use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    pub redis_url: String,
    /// Use Redis as the broker instead of the in-process channel
    pub redis_enabled: bool,
    pub worker_concurrency: usize,
    pub job_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub api_key: String,
    /// Overrides the provider's default base URL (OpenAI-compatible servers)
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub provider: String,
    pub serper_api_key: String,
    pub serpapi_key: String,
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
}

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "*".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .unwrap_or_else(|_| (50 * 1024 * 1024).to_string())
                    .parse()?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://financial_analysis.db?mode=rwc".to_string()),
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            queue: QueueConfig {
                redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/0".to_string()),
                redis_enabled: env::var("USE_JOB_QUEUE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()?,
                worker_concurrency: env::var("WORKER_CONCURRENCY")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()?,
                job_timeout_secs: match env::var("JOB_TIMEOUT_SECS") {
                    Ok(v) if !v.trim().is_empty() => Some(v.trim().parse()?),
                    _ => None,
                },
            },
            llm: LLMConfig {
                provider: env::var("LLM_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                temperature: env::var("LLM_TEMPERATURE")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()?,
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: env::var("LLM_API_BASE").ok().filter(|s| !s.is_empty()),
            },
            search: SearchConfig {
                provider: env::var("SEARCH_PROVIDER").unwrap_or_else(|_| "serper".to_string()),
                serper_api_key: env::var("SERPER_API_KEY").unwrap_or_default(),
                serpapi_key: env::var("SERPAPI_API_KEY").unwrap_or_default(),
                max_results: 4,
            },
            storage: StorageConfig {
                upload_dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "data".to_string())),
            },
        })
    }

    /// Configuration used by unit tests: in-memory database, local channel queue,
    /// uploads under `upload_dir`.
    #[cfg(test)]
    pub fn for_tests(upload_dir: PathBuf, llm_api_base: String) -> Self {
        Self {
            server: ServerConfig {
                port: 0,
                host: "127.0.0.1".to_string(),
                cors_allowed_origins: vec!["*".to_string()],
                max_upload_bytes: 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            queue: QueueConfig {
                redis_url: String::new(),
                redis_enabled: false,
                worker_concurrency: 1,
                job_timeout_secs: None,
            },
            llm: LLMConfig {
                provider: "openai".to_string(),
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.1,
                api_key: "test-key".to_string(),
                api_base: Some(llm_api_base),
            },
            search: SearchConfig {
                provider: "serper".to_string(),
                serper_api_key: String::new(),
                serpapi_key: String::new(),
                max_results: 4,
            },
            storage: StorageConfig { upload_dir },
        }
    }
}
