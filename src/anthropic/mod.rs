//! Anthropic API client.
//!
//! This module provides:
//! - Messages API integration for plain text completions
//! - Retry logic with exponential backoff
//! - Request validation with size limits
//!
//! # Example
//!
//! ```
//! use triage_assist::anthropic::{AnthropicClient, ClientConfig};
//!
//! let config = ClientConfig::default().with_max_retries(1);
//! let client = AnthropicClient::new("sk-ant-xxx", config).unwrap();
//! assert_eq!(client.base_url(), "https://api.anthropic.com/v1");
//! ```

mod client;
mod config;
mod types;

pub use client::{AnthropicClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
pub use types::{ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock, ModelResponse};
