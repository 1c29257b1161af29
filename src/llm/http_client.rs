// src/llm/http_client.rs
// HTTP transport for the completion provider: timeouts plus bounded transient retries

use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use crate::error::{RelayError, Result};
use crate::llm::openai_compat::extract_error_message;

/// Default retries for transient failures (429, 5xx, connect, timeout)
const DEFAULT_MAX_RETRIES: u32 = 2;
/// Default base backoff between retries (doubles each attempt)
const DEFAULT_BASE_BACKOFF_MS: u64 = 500;
/// Default request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

pub struct LlmHttpClient {
    client: Client,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            request_timeout,
            connect_timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
        }
    }

    pub fn with_retries(mut self, max_retries: u32, base_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_backoff = base_backoff;
        self
    }

    /// POST a JSON body with Bearer auth, retrying transient failures.
    /// Returns the response body as text on success.
    pub async fn post_json_with_retry(
        &self,
        request_id: &str,
        url: &str,
        api_key: &str,
        body: String,
    ) -> Result<String> {
        let mut retries = 0;
        let mut backoff = self.base_backoff;

        loop {
            let response_result = self
                .client
                .post(url)
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .body(body.clone())
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let error_body = response.text().await.unwrap_or_default();

                        if retries < self.max_retries
                            && (status.as_u16() == 429 || status.is_server_error())
                        {
                            warn!(
                                request_id = %request_id,
                                status = %status,
                                "Transient provider error, retrying in {:?}...",
                                backoff
                            );
                            tokio::time::sleep(backoff).await;
                            retries += 1;
                            backoff *= 2;
                            continue;
                        }

                        return Err(RelayError::upstream(format!(
                            "API error {}: {}",
                            status,
                            extract_error_message(&error_body)
                        )));
                    }

                    return response.text().await.map_err(RelayError::from);
                }
                Err(e) => {
                    // Only connect/timeout failures are safe to resend
                    if retries < self.max_retries && (e.is_connect() || e.is_timeout()) {
                        warn!(
                            request_id = %request_id,
                            error = %e,
                            "Provider request failed (connect/timeout), retrying in {:?}...",
                            backoff
                        );
                        tokio::time::sleep(backoff).await;
                        retries += 1;
                        backoff *= 2;
                        continue;
                    }
                    return Err(RelayError::upstream(format!("request to provider failed: {e}")));
                }
            }
        }
    }
}
