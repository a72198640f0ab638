//! Generation request passed to every provider.

use std::time::Duration;

use serde::Serialize;

/// Default generation timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A single generation call: system instructions, user content and limits.
///
/// Chat-style providers send `system` and `user` as separate messages.
/// Prompt-style providers use [`GenerationRequest::flattened_prompt`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// System instructions (safety constraints and framing).
    pub system: String,
    /// User-facing content (profile, history, current message).
    pub user: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Timeout applied to the outbound call.
    #[serde(skip)]
    pub timeout: Duration,
}

impl GenerationRequest {
    /// Create a request with default limits (500 tokens, 0.7, 30 s).
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 500,
            temperature: 0.7,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the token limit.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the outbound call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// System and user content joined into a single prompt.
    pub fn flattened_prompt(&self) -> String {
        if self.system.trim().is_empty() {
            return self.user.clone();
        }
        format!("{}\n\n{}", self.system, self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = GenerationRequest::new("sys", "user");
        assert_eq!(request.max_tokens, 500);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builder_overrides() {
        let request = GenerationRequest::new("sys", "user")
            .with_max_tokens(150)
            .with_temperature(0.8)
            .with_timeout(Duration::from_secs(10));

        assert_eq!(request.max_tokens, 150);
        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_flattened_prompt() {
        let request = GenerationRequest::new("Be kind.", "Hello there");
        assert_eq!(request.flattened_prompt(), "Be kind.\n\nHello there");

        let bare = GenerationRequest::new("  ", "Hello there");
        assert_eq!(bare.flattened_prompt(), "Hello there");
    }
}
