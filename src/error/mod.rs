//! Error types for the triage assistant.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`AssistError`]: Failures of the AI-backed analysis path
//! - [`IntakeError`]: Intake form validation errors
//! - [`SessionError`]: Wizard session transition errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.
//!
//! The local diagnostic engine has no error type: it accepts any well-typed
//! input and always produces an [`Analysis`](crate::model::Analysis).

use thiserror::Error;

/// Top-level application error.
///
/// This is the error type returned by the binary driver. Library entry
/// points return the narrower subsystem errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Anthropic API error.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// AI-backed analysis error.
    #[error("Assistant error: {0}")]
    Assist(#[from] AssistError),

    /// Intake validation error.
    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Session transition error.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input/output error.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
    },

    /// Malformed JSON input.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what's invalid.
        message: String,
    },
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting, overload, timeout and network errors are retryable.
    /// Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ModelOverloaded { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }
}

/// Errors from the AI-backed analysis path.
///
/// The assistant never surfaces these to callers; each one triggers the
/// local fallback and is logged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistError {
    /// The completion API could not be reached or rejected the request.
    #[error("API unavailable: {message}")]
    ApiUnavailable {
        /// Description of why the API is unavailable.
        message: String,
    },

    /// No JSON could be extracted from the model output.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Description of the parsing error.
        message: String,
    },

    /// A required field was absent from the model output.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The missing field name.
        field: String,
    },

    /// A field had a value outside its domain.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Intake validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    /// A patient field failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// The field name.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Wizard session errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested step change is not allowed from the current step.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current step.
        from: String,
        /// Requested step.
        to: String,
    },

    /// The operation requires an analysis that has not been produced yet.
    #[error("Session has no analysis")]
    MissingAnalysis,
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
