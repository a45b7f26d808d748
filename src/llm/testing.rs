//! Scripted adapter for exercising agents and pipelines without a network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::{LLMConfig, DEFAULT_MODEL};
use crate::llm::{LLMAdapter, LLM};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};

#[derive(Default)]
pub struct ScriptedAdapter {
    replies: Mutex<VecDeque<AppResult<String>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(AppError::LLMApi(message.to_string()))])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn llm(self: &Arc<Self>) -> LLM {
        LLM::with_adapter(self.clone(), &test_llm_config())
    }
}

pub fn test_llm_config() -> LLMConfig {
    LLMConfig {
        provider: "openai".to_string(),
        model: DEFAULT_MODEL.to_string(),
        temperature: 0.1,
        api_key: "test-key".to_string(),
        api_base: None,
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::LLMApi("script exhausted".to_string())))?;

        Ok(LLMResponse {
            content: reply,
            finish_reason: "stop".to_string(),
            usage: TokenUsage::default(),
        })
    }
}
