//! Engine-wide configuration.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Default text for errors that carry no message.
pub const DEFAULT_UNKNOWN_ERROR: &str = "There was an error processing the request.";

/// Settings shared by every request of an [`Environment`](crate::Environment).
///
/// Deserializable so an application can keep it next to its own settings.
/// Durations are given in milliseconds:
///
/// ```json
/// { "request_timeout": 15000, "confirm_timeout": 60000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Endpoint used when neither the options nor the navigator provide one.
    pub default_url: Option<String>,
    /// Upper bound on the network exchange.
    #[serde(deserialize_with = "millis")]
    pub request_timeout: Option<Duration>,
    /// Upper bound on `ajaxConfirmMessage` listeners.
    #[serde(deserialize_with = "millis")]
    pub confirm_timeout: Option<Duration>,
    /// Upper bound on `ajaxBeforeUpdate` listeners.
    #[serde(deserialize_with = "millis")]
    pub before_update_timeout: Option<Duration>,
    /// Message shown for errors without one.
    pub unknown_error_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_url: None,
            request_timeout: None,
            confirm_timeout: None,
            before_update_timeout: None,
            unknown_error_message: DEFAULT_UNKNOWN_ERROR.to_owned(),
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
}

impl EngineConfig {
    /// Default configuration: no timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set the fallback endpoint.
    pub fn default_url(mut self, url: impl Into<String>) -> Self {
        self.default_url = Some(url.into());
        self
    }

    /// Bound the network exchange.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Bound confirmation listeners.
    pub fn confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = Some(timeout);
        self
    }

    /// Bound pre-update listeners.
    pub fn before_update_timeout(mut self, timeout: Duration) -> Self {
        self.before_update_timeout = Some(timeout);
        self
    }

    /// Replace the fallback error text.
    pub fn unknown_error_message(mut self, message: impl Into<String>) -> Self {
        self.unknown_error_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_millis() {
        let json = r#"{"request_timeout": 1500, "default_url": "/ajax"}"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.default_url.as_deref(), Some("/ajax"));
        assert_eq!(config.confirm_timeout, None);
        assert_eq!(config.unknown_error_message, DEFAULT_UNKNOWN_ERROR);
    }

    #[test]
    fn test_null_timeout_is_none() {
        let config = EngineConfig::from_json(r#"{"confirm_timeout": null}"#).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .before_update_timeout(Duration::from_secs(2))
            .unknown_error_message("Oops");
        assert_eq!(config.before_update_timeout, Some(Duration::from_secs(2)));
        assert_eq!(config.unknown_error_message, "Oops");
    }
}
