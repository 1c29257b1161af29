// src/llm/provider/openai.rs
// OpenAI chat completions client (non-streaming)

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{Span, debug, instrument};
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::Result;
use crate::llm::http_client::{DEFAULT_CONNECT_TIMEOUT_SECS, LlmHttpClient};
use crate::llm::logging::{log_completion, log_usage};
use crate::llm::openai_compat::{ChatRequest, parse_chat_response};
use crate::llm::provider::LlmClient;
use crate::llm::{ChatResult, Message};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiClient {
    api_key: String,
    model: String,
    endpoint: String,
    http: LlmHttpClient,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, base_url: &str, request_timeout: Duration) -> Self {
        let http = LlmHttpClient::new(
            request_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        );
        Self::with_http(api_key, model, base_url, http)
    }

    /// Build from an explicit transport (tests tune retries/backoff this way)
    pub fn with_http(api_key: String, model: String, base_url: &str, http: LlmHttpClient) -> Self {
        Self {
            api_key,
            model,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_COMPLETIONS_PATH),
            http,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, messages), fields(request_id, model = %self.model, message_count = messages.len()))]
    async fn complete(&self, messages: Vec<Message>, max_tokens: u32) -> Result<ChatResult> {
        let request_id = Uuid::new_v4().to_string();
        let start_time = Instant::now();

        Span::current().record("request_id", request_id.as_str());

        let request = ChatRequest::new(&self.model, messages).with_max_tokens(max_tokens);
        let body = serde_json::to_string(&request)?;
        debug!(request_id = %request_id, max_tokens, "Sending OpenAI chat request");

        let response_body = self
            .http
            .post_json_with_retry(&request_id, &self.endpoint, &self.api_key, body)
            .await?;

        let duration_ms = start_time.elapsed().as_millis() as u64;
        let result = parse_chat_response(&response_body, &request_id, duration_ms)?;

        if let Some(ref u) = result.usage {
            log_usage(&request_id, "OpenAI", u);
        }
        log_completion(
            &request_id,
            "OpenAI",
            duration_ms,
            result.content.as_ref().map(|c| c.len()).unwrap_or(0),
        );

        Ok(result)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(&self, messages: Vec<Message>, max_tokens: u32) -> Result<ChatResult> {
        self.complete(messages, max_tokens).await
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}
