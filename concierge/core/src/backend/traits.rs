//! Response Provider Traits
//!
//! Trait definitions for text-generation providers. The controller only
//! ever talks to a `ResponseProvider`, so the HTTP integration, the
//! offline scripted responder and test doubles are interchangeable.
//!
//! # Contract
//!
//! - One call per `generate`; no retries, backoff or caching
//! - Success is the reply text, opaque (no sanitization)
//! - Every failure is one normalized `ProviderError`

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::Turn;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Everything a provider needs to produce the next reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Persona/system instruction
    pub persona: String,
    /// Prior turns, oldest first
    pub history: Vec<Turn>,
    /// The new user message
    pub message: String,
}

impl ProviderRequest {
    /// Create a request without history
    pub fn new(persona: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            history: Vec::new(),
            message: message.into(),
        }
    }

    /// Set prior turns
    #[must_use]
    pub fn with_history(mut self, history: &[Turn]) -> Self {
        self.history = history.to_vec();
        self
    }
}

/// Normalized provider failure
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never got a response (DNS, connect, TLS, reset)
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// JSON was fine but held no candidate text
    #[error("response contained no candidate text")]
    NoCandidate,

    /// The deadline expired before the provider answered
    #[error("no reply within {0} ms")]
    Timeout(u64),

    /// Provider cannot be used (e.g. missing API key)
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Map a reqwest error that happened before a usable response arrived
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Response provider trait
///
/// Implement this trait to add support for a different generation API.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Get the provider name (e.g., "Gemini", "Scripted")
    fn name(&self) -> &str;

    /// Produce the reply to `request.message`
    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError>;
}

/// Lets a provider picked at runtime drive a `Concierge<Box<dyn ResponseProvider>>`
#[async_trait]
impl<T: ResponseProvider + ?Sized> ResponseProvider for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        (**self).generate(request).await
    }
}

/// Provider connection configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Base URL up to and including the API version
    pub base_url: String,
    /// Deadline for a single call, in seconds
    pub timeout_secs: u64,
    /// Also send the persona as a leading "user" turn
    pub repeat_persona: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            repeat_persona: true,
        }
    }
}

impl ProviderConfig {
    /// Deadline for a single call
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_request_builder() {
        let history = vec![Turn::assistant("hello"), Turn::user("hi")];
        let request = ProviderRequest::new("Be nice", "how are you?").with_history(&history);

        assert_eq!(request.persona, "Be nice");
        assert_eq!(request.message, "how are you?");
        assert_eq!(request.history, history);
    }

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.repeat_persona);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = ProviderConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_api_key());
    }
}
