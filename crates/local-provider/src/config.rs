//! Configuration for LocalModelProvider.

use std::env;

use provider_core::parse_flag;

/// Default Hugging Face model id handed to the generator's loader.
pub const DEFAULT_MODEL_NAME: &str = "Qwen/Qwen2-0.5B-Instruct";

/// Configuration for LocalModelProvider.
#[derive(Debug, Clone)]
pub struct LocalModelConfig {
    /// Whether the in-process model should be used.
    pub enabled: bool,
    /// Model identifier passed to [`crate::TextGenerator::load`].
    pub model_name: String,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

impl LocalModelConfig {
    /// Create configuration from environment variables.
    ///
    /// - `USE_LOCAL_MODEL` - enable the provider (`1`, `true`, `yes`)
    /// - `LOCAL_MODEL_NAME` - model identifier (default: Qwen/Qwen2-0.5B-Instruct)
    pub fn from_env() -> Self {
        let enabled = env::var("USE_LOCAL_MODEL")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let model_name =
            env::var("LOCAL_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string());

        Self {
            enabled,
            model_name,
        }
    }

    /// Create a new config builder.
    pub fn builder() -> LocalModelConfigBuilder {
        LocalModelConfigBuilder::default()
    }
}

/// Builder for LocalModelConfig.
#[derive(Debug, Default)]
pub struct LocalModelConfigBuilder {
    config: LocalModelConfig,
}

impl LocalModelConfigBuilder {
    /// Enable or disable the provider.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the model name.
    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.config.model_name = name.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> LocalModelConfig {
        self.config
    }
}
