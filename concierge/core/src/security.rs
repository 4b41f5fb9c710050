//! Input Limits
//!
//! Visitor input is untrusted and is forwarded verbatim to a paid API, so
//! it is checked at the boundary before a turn is created:
//! - oversized messages are rejected
//! - control characters (other than newline, tab, carriage return) are rejected
//!
//! Empty input is not handled here; the controller treats it separately
//! because it is a normal, silent no-op for the surface.

use serde::{Deserialize, Serialize};

/// Limits applied to submitted messages
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    /// Maximum size of a single message in bytes (default: 4KB)
    pub max_message_bytes: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_message_bytes: 4 * 1024,
        }
    }
}

/// Result of input validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationResult {
    /// Input is valid
    Valid,
    /// Input is invalid with reason
    Invalid(String),
}

impl ValidationResult {
    /// Check if the result indicates valid input
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Input validator for submitted messages
#[derive(Clone, Debug, Default)]
pub struct InputValidator {
    limits: InputLimits,
}

impl InputValidator {
    /// Create a new input validator with the given limits
    #[must_use]
    pub fn new(limits: InputLimits) -> Self {
        Self { limits }
    }

    /// Validate a user message
    #[must_use]
    pub fn validate_message(&self, content: &str) -> ValidationResult {
        if content.len() > self.limits.max_message_bytes {
            return ValidationResult::Invalid(format!(
                "Message too large: {} bytes (max: {})",
                content.len(),
                self.limits.max_message_bytes
            ));
        }

        if content
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r')
        {
            return ValidationResult::Invalid(
                "Message contains invalid control characters".to_string(),
            );
        }

        ValidationResult::Valid
    }

    /// Configured limits
    #[must_use]
    pub fn limits(&self) -> &InputLimits {
        &self.limits
    }
}
