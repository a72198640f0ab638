//! GeminiProvider implementation.

use async_trait::async_trait;
use provider_core::{GenerationRequest, Provider, ProviderError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeminiConfig;

/// Header carrying the API key. Keeps the key out of request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Replies at or below this many characters are rejected.
pub const MIN_REPLY_CHARS: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Provider backed by the Gemini `generateContent` API.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ProviderError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create a new provider from environment variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(GeminiConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn probe(&self) -> bool {
        self.config.is_usable()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        if !self.config.is_usable() {
            return Err(ProviderError::Unavailable(
                "USE_GENAI and GOOGLE_API_KEY are required".into(),
            ));
        }

        let system_instruction = (!request.system.trim().is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: request.system.clone(),
            }],
        });

        let body = GenerateContentRequest {
            system_instruction,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.user.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        debug!("Calling Gemini model {}", self.config.model);

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Gemini returned {}", status);
            return Err(ProviderError::ProcessingFailed(format!(
                "Gemini returned {}: {}",
                status, text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::ProcessingFailed(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        let text = text.trim();

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        if text.chars().count() <= MIN_REPLY_CHARS {
            return Err(ProviderError::ProcessingFailed(format!(
                "Gemini reply too short ({} chars)",
                text.chars().count()
            )));
        }

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn provider_for(url: &str) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig::new("g-key").with_api_url(url)).unwrap()
    }

    fn reply_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_probe_follows_config() {
        let disabled = GeminiProvider::new(GeminiConfig::default()).unwrap();
        assert!(!disabled.probe().await);
        assert!(provider_for("http://127.0.0.1:1").probe().await);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_header("x-goog-api-key", "g-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "rules"}]},
                "contents": [{"role": "user", "parts": [{"text": "question"}]}],
                "generationConfig": {"maxOutputTokens": 300}
            })))
            .with_status(200)
            .with_body(reply_body("Please rest and drink plenty of fluids today."))
            .expect(1)
            .create_async()
            .await;

        let request = GenerationRequest::new("rules", "question").with_max_tokens(300);
        let reply = provider_for(&server.url()).generate(&request).await.unwrap();

        assert_eq!(reply, "Please rest and drink plenty of fluids today.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_rejects_short_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(reply_body("Okay."))
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ProcessingFailed(_)));
    }

    #[tokio::test]
    async fn test_generate_no_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let err = provider_for(&server.url())
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_key() {
        let provider =
            GeminiProvider::new(GeminiConfig::new("top-secret-key").with_api_url("http://127.0.0.1:1"))
                .unwrap();

        let err = provider
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Network(_)));
        assert!(!err.to_string().contains("top-secret-key"));
    }

    #[tokio::test]
    async fn test_generate_when_disabled() {
        let provider = GeminiProvider::new(GeminiConfig::new("g-key").with_enabled(false)).unwrap();
        let err = provider
            .generate(&GenerationRequest::new("", "hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
