//! OpenAiProvider implementation.

use async_trait::async_trait;
use provider_core::{GenerationRequest, Provider, ProviderError};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiConfig;

/// Provider backed by an OpenAI-compatible chat-completion API.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new OpenAiProvider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a new OpenAiProvider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OpenAiConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn probe(&self) -> bool {
        self.config.has_api_key()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        if !self.config.has_api_key() {
            return Err(ProviderError::Unavailable("OPENAI_API_KEY not set".into()));
        }

        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(request.system.clone()),
                ChatMessage::user(request.user.clone()),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(
            "Sending chat completion to {} (model {}, max_tokens {})",
            self.config.api_url, self.config.model, request.max_tokens
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!("OpenAI API error ({}): {}", status, message);
            return Err(ProviderError::ProcessingFailed(format!(
                "OpenAI API error ({}): {}",
                status, message
            )));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            ProviderError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e.to_string())
    }
}
