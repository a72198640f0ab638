//! Configuration for OllamaProvider.

use std::env;
use std::time::Duration;

/// Default daemon URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "mistral";

/// Default availability probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Configuration for OllamaProvider.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Daemon base URL.
    pub base_url: String,
    /// Model to generate with.
    pub model: String,
    /// Timeout for the `/api/tags` probe.
    pub probe_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl OllamaConfig {
    /// Create configuration from environment variables.
    ///
    /// - `OLLAMA_BASE_URL` - daemon URL (default: http://localhost:11434)
    /// - `OLLAMA_MODEL` - model name (default: mistral)
    pub fn from_env() -> Self {
        let base_url = env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            base_url,
            model,
            ..Self::default()
        }
    }

    /// Create a new config builder.
    pub fn builder() -> OllamaConfigBuilder {
        OllamaConfigBuilder::default()
    }
}

/// Builder for OllamaConfig.
#[derive(Debug, Default)]
pub struct OllamaConfigBuilder {
    config: OllamaConfig,
}

impl OllamaConfigBuilder {
    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the probe timeout.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OllamaConfig {
        self.config
    }
}
