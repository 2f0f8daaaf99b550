//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock completion clients with fixed behaviour
//! - Patient fixtures
//! - A fixed-time provider
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::error::AssistError;
use crate::model::{Gender, PatientData};
use crate::traits::{CompletionResponse, MockCompletionClient, MockTimeProvider, Usage};
use chrono::{DateTime, Utc};

/// Create a mock completion client that always returns `content`.
///
/// # Example
///
/// ```ignore
/// let mock = mock_client_replying(r#"{"riskLevel": "low"}"#);
/// let result = mock.complete(messages, config).await;
/// assert!(result.unwrap().content.contains("low"));
/// ```
#[must_use]
pub fn mock_client_replying(content: impl Into<String>) -> MockCompletionClient {
    let content = content.into();
    let mut mock = MockCompletionClient::new();
    mock.expect_complete()
        .returning(move |_, _| Ok(CompletionResponse::new(content.clone(), Usage::new(100, 50))));
    mock
}

/// Create a mock completion client whose every call fails with
/// [`AssistError::ApiUnavailable`].
#[must_use]
pub fn mock_client_failing(message: impl Into<String>) -> MockCompletionClient {
    let message = message.into();
    let mut mock = MockCompletionClient::new();
    mock.expect_complete().returning(move |_, _| {
        Err(AssistError::ApiUnavailable {
            message: message.clone(),
        })
    });
    mock
}

/// Create a mock time provider that always returns `time`.
#[must_use]
pub fn mock_time(time: DateTime<Utc>) -> MockTimeProvider {
    let mut mock = MockTimeProvider::new();
    mock.expect_now().return_const(time);
    mock
}

/// Create an adult patient with the given symptom text.
#[must_use]
pub fn test_patient(symptoms: &str) -> PatientData {
    PatientData::new("Paciente Teste", 50, Gender::Male, symptoms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{CompletionClient, CompletionConfig, Message, TimeProvider};

    #[tokio::test]
    async fn test_mock_client_replying() {
        let mock = mock_client_replying("{}");
        let response = mock
            .complete(vec![Message::user("a")], CompletionConfig::new())
            .await
            .unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.usage.total(), 150);
    }

    #[tokio::test]
    async fn test_mock_client_failing() {
        let mock = mock_client_failing("offline");
        let err = mock
            .complete(vec![Message::user("a")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AssistError::ApiUnavailable {
                message: "offline".to_string()
            }
        );
    }

    #[test]
    fn test_mock_time() {
        let time = "2024-01-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(mock_time(time).now(), time);
    }

    #[test]
    fn test_patient_fixture_is_valid() {
        assert!(test_patient("tosse").validate().is_ok());
    }
}
