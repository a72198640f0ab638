//! Configuration for GeminiProvider.

use std::env;

use provider_core::parse_flag;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Configuration for GeminiProvider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Whether the provider is switched on at all.
    pub enabled: bool,

    /// API key. Blank means "not configured".
    pub api_key: String,

    /// API base URL.
    pub api_url: String,

    /// Model name.
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// - `USE_GENAI` - enable the provider (`1`, `true`, `yes`)
    /// - `GOOGLE_API_KEY` - API key
    /// - `GEMINI_MODEL` - model name (default: gemini-pro)
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    pub fn from_env() -> Self {
        let enabled = env::var("USE_GENAI")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let api_key = env::var("GOOGLE_API_KEY").unwrap_or_default();

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            enabled,
            api_key,
            api_url,
            model,
        }
    }

    /// Create an enabled configuration with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Set the API URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Enable or disable the provider.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the provider is enabled and has a key.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}
