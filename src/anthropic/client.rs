//! Anthropic API client with retry logic.
//!
//! This module provides:
//! - HTTP client for the Anthropic Messages API
//! - Retry logic with exponential backoff
//! - Request validation
//! - Response parsing

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::config::ClientConfig;
use super::types::{ApiMessage, ApiRequest, ApiResponse, ModelResponse};
use crate::error::{AnthropicError, AssistError};
use crate::traits::{
    CompletionClient, CompletionConfig, CompletionResponse, Message, Role, Usage,
};

/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 50;
/// Maximum content length per message (50KB).
pub const MAX_CONTENT_LENGTH: usize = 50_000;

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Status code the API uses for an overloaded model.
const STATUS_OVERLOADED: u16 = 529;

/// Seconds to wait when a 429 carries no usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECONDS: u64 = 60;

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AnthropicError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a completion request with retry logic.
    pub async fn complete(&self, request: ApiRequest) -> Result<ModelResponse, AnthropicError> {
        Self::validate_request(&request)?;
        self.execute_with_retry(&request).await
    }

    /// Validate request size limits.
    fn validate_request(request: &ApiRequest) -> Result<(), AnthropicError> {
        if request.messages.is_empty() {
            return Err(AnthropicError::InvalidRequest {
                message: "Request has no messages".to_string(),
            });
        }

        if request.messages.len() > MAX_MESSAGES {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Too many messages: {} > {MAX_MESSAGES}",
                    request.messages.len()
                ),
            });
        }

        if let Some(msg) = request
            .messages
            .iter()
            .find(|m| m.content.len() > MAX_CONTENT_LENGTH)
        {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Message too large: {} > {MAX_CONTENT_LENGTH}",
                    msg.content.len()
                ),
            });
        }

        Ok(())
    }

    /// Execute request with retry logic.
    async fn execute_with_retry(
        &self,
        request: &ApiRequest,
    ) -> Result<ModelResponse, AnthropicError> {
        let mut last_error = None;
        let mut delay = self.config.retry_delay_ms;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(attempt, delay_ms = delay, "Retrying Anthropic request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2);
            }

            match self.execute_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(error = %e, attempt, "Retryable error occurred");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AnthropicError::Network {
            message: "Unknown error after retries".to_string(),
        }))
    }

    /// Execute a single request attempt.
    async fn execute_once(&self, request: &ApiRequest) -> Result<ModelResponse, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let start = Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            content_bytes = request.content_bytes(),
            timeout_ms = self.config.timeout_ms,
            "Starting Anthropic API request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let elapsed_ms = elapsed_ms(start);
                if e.is_timeout() {
                    tracing::error!(url = %url, elapsed_ms, "Anthropic API request timed out");
                    AnthropicError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::error!(url = %url, elapsed_ms, error = %e, "Anthropic API request failed");
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = elapsed_ms(start),
            "Anthropic API response received"
        );

        if status == StatusCode::UNAUTHORIZED {
            return Err(AnthropicError::AuthenticationFailed);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS);
            return Err(AnthropicError::RateLimited {
                retry_after_seconds: retry_after,
            });
        }

        if status.as_u16() == STATUS_OVERLOADED {
            return Err(AnthropicError::ModelOverloaded {
                model: request.model.clone(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnthropicError::UnexpectedResponse {
                message: format!("Status {status}: {body}"),
            });
        }

        let body: ApiResponse =
            response
                .json()
                .await
                .map_err(|e| AnthropicError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                })?;

        Self::parse_response(body)
    }

    /// Join the text blocks of a response.
    fn parse_response(response: ApiResponse) -> Result<ModelResponse, AnthropicError> {
        let text = response
            .content
            .iter()
            .filter_map(|block| block.as_text())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(AnthropicError::UnexpectedResponse {
                message: "No text content in response".to_string(),
            });
        }

        Ok(ModelResponse {
            text,
            usage: response.usage,
            stop_reason: response.stop_reason,
        })
    }

    /// Build an API request from trait-level messages and options.
    fn build_request(&self, messages: Vec<Message>, config: CompletionConfig) -> ApiRequest {
        let api_messages = messages
            .into_iter()
            .map(|m| match m.role {
                Role::User => ApiMessage::user(m.content),
                Role::Assistant => ApiMessage::assistant(m.content),
            })
            .collect();

        let max_tokens = config.max_tokens.unwrap_or(self.config.max_tokens);
        let mut request = ApiRequest::new(&self.config.model, max_tokens, api_messages);

        if let Some(temperature) = config.temperature {
            request = request.with_temperature(f64::from(temperature));
        }
        if let Some(system) = config.system_prompt {
            request = request.with_system(system);
        }

        request
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AssistError> {
        let request = self.build_request(messages, config);

        // Call the inherent method, not the trait method
        let response = Self::complete(self, request)
            .await
            .map_err(|e| AssistError::ApiUnavailable {
                message: e.to_string(),
            })?;

        Ok(CompletionResponse::new(
            response.text,
            Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        ))
    }
}

#[async_trait]
impl CompletionClient for Arc<AnthropicClient> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AssistError> {
        <AnthropicClient as CompletionClient>::complete(self.as_ref(), messages, config).await
    }
}
