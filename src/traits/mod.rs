//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`CompletionClient`]: text completion abstraction over the model API
//! - [`TimeProvider`]: time abstraction for testing
//!
//! It also re-exports shared types from the `types` submodule.
//!
//! # Mocking
//!
//! Both traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use triage_assist::traits::{RealTimeProvider, TimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

mod types;

pub use types::{CompletionConfig, CompletionResponse, Message, Role, Usage};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AssistError;

/// Text completion client.
///
/// The diagnostic assistant depends on this trait rather than on the HTTP
/// client so the AI path can be exercised without a network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AssistError::ApiUnavailable`] if the request could not be
    /// completed, after any retries the implementation performs.
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AssistError>;
}

/// Time provider trait for deterministic testing.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(RealTimeProvider: Send, Sync, Clone, Copy, Default);

    #[test]
    fn test_real_time_provider_now() {
        let provider = RealTimeProvider;
        let before = Utc::now();
        let now = provider.now();
        let after = Utc::now();
        assert!(now >= before);
        assert!(now <= after);
    }

    #[tokio::test]
    async fn test_mock_completion_client() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|messages, _config| messages.len() == 1 && messages[0].role == Role::User)
            .returning(|_msgs, _config| {
                Ok(CompletionResponse::new("{}", Usage::new(10, 20)))
            });

        let response = mock
            .complete(vec![Message::user("Olá")], CompletionConfig::new())
            .await
            .unwrap();

        assert_eq!(response.content, "{}");
        assert_eq!(response.usage.total(), 30);
    }

    #[tokio::test]
    async fn test_mock_completion_client_error() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_msgs, _config| {
            Err(AssistError::ApiUnavailable {
                message: "offline".to_string(),
            })
        });

        let result = mock
            .complete(vec![Message::user("Olá")], CompletionConfig::new())
            .await;

        assert!(matches!(result, Err(AssistError::ApiUnavailable { .. })));
    }

    #[test]
    fn test_mock_time_provider() {
        let fixed_time = Utc::now() - chrono::Duration::days(1);
        let mut mock = MockTimeProvider::new();
        mock.expect_now().return_const(fixed_time);

        assert_eq!(mock.now(), fixed_time);
    }
}
