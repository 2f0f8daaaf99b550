//! Configuration validation.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if:
/// - `ANTHROPIC_API_KEY` is set but empty
/// - `ANTHROPIC_MODEL` or `ANTHROPIC_BASE_URL` is blank
/// - `REQUEST_TIMEOUT_MS` is outside 1000–300000
/// - `MAX_RETRIES` is above 10
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config
        .api_key
        .as_ref()
        .is_some_and(|key| key.expose().trim().is_empty())
    {
        return Err(invalid("ANTHROPIC_API_KEY", "must not be empty when set"));
    }

    if config.model.trim().is_empty() {
        return Err(invalid("ANTHROPIC_MODEL", "must not be empty"));
    }

    if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
        return Err(invalid("ANTHROPIC_BASE_URL", "must be an http(s) URL"));
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&config.request_timeout_ms) {
        return Err(invalid(
            "REQUEST_TIMEOUT_MS",
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ));
    }

    if config.max_retries > MAX_RETRIES {
        return Err(invalid(
            "MAX_RETRIES",
            format!("must be between 0 and {MAX_RETRIES}"),
        ));
    }

    Ok(())
}

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason: reason.into(),
    }
}
