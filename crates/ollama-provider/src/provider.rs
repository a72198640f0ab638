//! OllamaProvider implementation.

use async_trait::async_trait;
use provider_core::{GenerationRequest, Provider, ProviderError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OllamaConfig;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Provider backed by a local Ollama daemon.
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create a new provider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OllamaConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn probe(&self) -> bool {
        let result = self
            .client
            .get(self.url("/api/tags"))
            .timeout(self.config.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!("Ollama probe returned {}", response.status());
                false
            }
            Err(e) => {
                debug!("Ollama probe failed: {}", e);
                false
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            model: &self.config.model,
            prompt: request.flattened_prompt(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Ollama returned {}: {}", status, text);
            return Err(ProviderError::ProcessingFailed(format!(
                "Ollama returned {}: {}",
                status, text
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            ProviderError::ProcessingFailed(format!("Failed to parse Ollama response: {}", e))
        })?;

        let text = parsed.response.trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(url: &str) -> OllamaProvider {
        OllamaProvider::new(OllamaConfig::builder().base_url(url).model("mistral").build()).unwrap()
    }

    #[tokio::test]
    async fn test_probe_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[]}"#)
            .expect(1)
            .create_async()
            .await;

        assert!(provider_for(&server.url()).probe().await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_probe_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(500)
            .create_async()
            .await;

        assert!(!provider_for(&server.url()).probe().await);
    }

    #[tokio::test]
    async fn test_probe_unreachable() {
        assert!(!provider_for("http://127.0.0.1:1").probe().await);
    }

    #[tokio::test]
    async fn test_generate_sends_flattened_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "mistral",
                "prompt": "rules\n\nquestion",
                "stream": false
            })))
            .with_status(200)
            .with_body(r#"{"response":" Stay hydrated. ","done":true}"#)
            .expect(1)
            .create_async()
            .await;

        let reply = provider_for(&server.url())
            .generate(&GenerationRequest::new("rules", "question"))
            .await
            .unwrap();

        assert_eq!(reply, "Stay hydrated.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_empty_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":""}"#)
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body("model not found")
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ProcessingFailed(_)));
    }
}
