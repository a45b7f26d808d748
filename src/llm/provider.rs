use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::LLMConfig;
use crate::llm::openai::OpenAIAdapter;
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configured completion client shared by every agent in a pipeline.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
    model: String,
    temperature: f32,
}

impl LLM {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        let adapter: Arc<dyn LLMAdapter> = match (config.provider.as_str(), &config.api_base) {
            (_, Some(base)) => Arc::new(OpenAIAdapter::new_with_api_base(&config.api_key, base)),
            ("openai", None) => Arc::new(OpenAIAdapter::new(&config.api_key)),
            ("openrouter", None) => Arc::new(OpenAIAdapter::openrouter(&config.api_key)),
            ("groq", None) => Arc::new(OpenAIAdapter::groq(&config.api_key)),
            (other, None) => {
                return Err(AppError::InvalidRequest(format!("Unsupported LLM provider: {}", other)));
            }
        };

        Ok(Self::with_adapter(adapter, config))
    }

    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, config: &LLMConfig) -> Self {
        Self {
            adapter,
            provider_name: config.provider.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one completion over `messages` with the configured model and temperature.
    pub async fn complete(
        &self,
        system_instruction: Option<String>,
        messages: Vec<LLMMessage>,
    ) -> AppResult<LLMResponse> {
        let request = LLMRequest {
            provider: self.provider_name.clone(),
            model: self.model.clone(),
            messages,
            max_tokens: Some(2048),
            temperature: Some(self.temperature),
            system_instruction,
        };

        let response = self.adapter.create_chat_completion(&request).await?;
        debug!(
            provider = %self.provider_name,
            model = %self.model,
            total_tokens = response.usage.total_tokens,
            "Completion received"
        );
        Ok(response)
    }
}
