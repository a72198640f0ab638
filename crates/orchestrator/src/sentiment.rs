//! Sentiment classification.
//!
//! An optional external [`SentimentModel`] is consulted first; its label is
//! normalized and its confidence scaled to a percentage. Messages that
//! mention a physical symptom are always pulled to NEGATIVE with a score of
//! at least 80. Without a model (or when it fails) a keyword heuristic
//! decides.

use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::text::{contains_any, round2};

/// Symptom terms that force a NEGATIVE label.
pub const SYMPTOM_TERMS: &[&str] = &[
    "nausea",
    "nauseous",
    "vomit",
    "vomiting",
    "sick to my stomach",
    "fever",
    "high fever",
    "temperature",
    "chills",
    "headache",
    "migraine",
    "dizzy",
    "dizziness",
    "pain",
    "sore throat",
    "cough",
    "flu",
    "ill",
    "sick",
];

const POSITIVE_TERMS: &[&str] = &["good", "great", "happy", "love", "excellent"];
const NEGATIVE_TERMS: &[&str] = &["bad", "sad", "terrible", "hate", "awful"];

/// Minimum score for a symptom-bearing message.
pub const SYMPTOM_SCORE_FLOOR: f64 = 80.0;

/// Sentiment polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Uppercase label as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Normalize a raw model label.
    ///
    /// `positive|negative|neutral` map directly (any case). Positional
    /// labels `LABEL_0/1/2` and `class 0/1/2` map to NEGATIVE, NEUTRAL and
    /// POSITIVE. Anything else is NEUTRAL.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim().to_lowercase();
        match raw.as_str() {
            "positive" | "pos" => return SentimentLabel::Positive,
            "negative" | "neg" => return SentimentLabel::Negative,
            "neutral" | "neu" => return SentimentLabel::Neutral,
            _ => {}
        }

        let index = raw
            .strip_prefix("label_")
            .or_else(|| raw.strip_prefix("class"))
            .map(str::trim)
            .and_then(|s| s.parse::<u8>().ok());

        match index {
            Some(0) => SentimentLabel::Negative,
            Some(2) => SentimentLabel::Positive,
            _ => SentimentLabel::Neutral,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified message: label plus a 1-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self { label, score }
    }

    /// Sentiment forced for greetings.
    pub fn greeting() -> Self {
        Self::new(SentimentLabel::Neutral, 50.0)
    }

    /// Sentiment forced for urgent messages.
    pub fn urgent() -> Self {
        Self::new(SentimentLabel::Negative, 95.0)
    }
}

/// Output of an external model before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSentiment {
    pub label: String,
    /// Probability in 0..=1.
    pub confidence: f64,
}

/// Errors from an external sentiment model.
#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("sentiment request failed: {0}")]
    Request(String),

    #[error("sentiment service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected sentiment response: {0}")]
    Malformed(String),
}

/// An external text-classification model.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn classify(&self, text: &str) -> Result<RawSentiment, SentimentError>;
}

/// Keyword-only classification.
pub fn heuristic(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    if contains_any(&lower, SYMPTOM_TERMS) {
        Sentiment::new(SentimentLabel::Negative, 85.0)
    } else if contains_any(&lower, POSITIVE_TERMS) {
        Sentiment::new(SentimentLabel::Positive, 90.0)
    } else if contains_any(&lower, NEGATIVE_TERMS) {
        Sentiment::new(SentimentLabel::Negative, 90.0)
    } else {
        Sentiment::new(SentimentLabel::Neutral, 50.0)
    }
}

/// Turn a raw model result into a [`Sentiment`], applying the symptom override.
///
/// A non-finite confidence is unusable and yields the keyword result.
pub fn normalize(raw: &RawSentiment, text: &str) -> Sentiment {
    if !raw.confidence.is_finite() {
        warn!("Sentiment model returned confidence {}, using keywords", raw.confidence);
        return heuristic(text);
    }
    let label = SentimentLabel::from_raw(&raw.label);
    let score = (raw.confidence * 100.0).clamp(1.0, 100.0);
    let mut sentiment = Sentiment::new(label, score);

    if contains_any(&text.to_lowercase(), SYMPTOM_TERMS) {
        sentiment.label = SentimentLabel::Negative;
        sentiment.score = sentiment.score.max(SYMPTOM_SCORE_FLOOR);
    }

    sentiment.score = round2(sentiment.score);
    sentiment
}

/// Sentiment classifier with an optional external model.
#[derive(Clone, Default)]
pub struct SentimentClassifier {
    model: Option<Arc<dyn SentimentModel>>,
}

impl SentimentClassifier {
    /// Keyword heuristic only.
    pub fn heuristic_only() -> Self {
        Self { model: None }
    }

    /// Use `model` first, falling back to the heuristic on error.
    pub fn with_model(model: Arc<dyn SentimentModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Build from environment: a Hugging Face model when `HF_API_TOKEN` is set.
    pub fn from_env() -> Self {
        match HuggingFaceConfig::from_env().map(HuggingFaceSentiment::new) {
            Some(Ok(model)) => {
                debug!("Sentiment model: {}", model.config.model);
                Self::with_model(Arc::new(model))
            }
            Some(Err(e)) => {
                warn!("Sentiment model disabled: {}", e);
                Self::heuristic_only()
            }
            None => Self::heuristic_only(),
        }
    }

    /// Whether an external model is configured.
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Classify `text`.
    pub async fn analyze(&self, text: &str) -> Sentiment {
        if let Some(model) = &self.model {
            match model.classify(text).await {
                Ok(raw) => return normalize(&raw, text),
                Err(e) => warn!("Sentiment model failed, using keywords: {}", e),
            }
        }
        heuristic(text)
    }
}

/// Default hosted sentiment model.
pub const DEFAULT_SENTIMENT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Default inference API base URL.
pub const DEFAULT_SENTIMENT_API_URL: &str = "https://api-inference.huggingface.co";

/// Configuration for [`HuggingFaceSentiment`].
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    pub api_token: String,
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl HuggingFaceConfig {
    /// Create a config with defaults for everything but the token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            model: DEFAULT_SENTIMENT_MODEL.to_string(),
            api_url: DEFAULT_SENTIMENT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Read `HF_API_TOKEN`, `SENTIMENT_MODEL` and `SENTIMENT_API_URL`.
    /// Returns `None` without a token.
    pub fn from_env() -> Option<Self> {
        let token = env::var("HF_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())?;
        let mut config = Self::new(token);
        if let Ok(model) = env::var("SENTIMENT_MODEL") {
            config.model = model;
        }
        if let Ok(url) = env::var("SENTIMENT_API_URL") {
            config.api_url = url;
        }
        Some(config)
    }

    /// Set the API URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Hosted text-classification model (Hugging Face Inference API).
pub struct HuggingFaceSentiment {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceSentiment {
    pub fn new(config: HuggingFaceConfig) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SentimentError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl SentimentModel for HuggingFaceSentiment {
    async fn classify(&self, text: &str) -> Result<RawSentiment, SentimentError> {
        let url = format!(
            "{}/models/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| SentimentError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SentimentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ClassificationResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::Malformed(e.to_string()))?;

        let scores = match parsed {
            ClassificationResponse::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            ClassificationResponse::Flat(scores) => scores,
        };

        scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| RawSentiment {
                label: best.label,
                confidence: best.score,
            })
            .ok_or_else(|| SentimentError::Malformed("no labels returned".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(&'static str, f64);

    #[async_trait]
    impl SentimentModel for FixedModel {
        async fn classify(&self, _text: &str) -> Result<RawSentiment, SentimentError> {
            Ok(RawSentiment {
                label: self.0.to_string(),
                confidence: self.1,
            })
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl SentimentModel for BrokenModel {
        async fn classify(&self, _text: &str) -> Result<RawSentiment, SentimentError> {
            Err(SentimentError::Request("offline".into()))
        }
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(SentimentLabel::from_raw("Positive"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_raw("NEGATIVE"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_raw("LABEL_0"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_raw("LABEL_1"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_raw("label_2"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_raw("class 0"), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_raw("class 2"), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_raw("LABEL_7"), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_raw("joy"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_heuristic_tiers() {
        assert_eq!(
            heuristic("I have a fever"),
            Sentiment::new(SentimentLabel::Negative, 85.0)
        );
        assert_eq!(
            heuristic("I feel great today"),
            Sentiment::new(SentimentLabel::Positive, 90.0)
        );
        assert_eq!(
            heuristic("what an awful week"),
            Sentiment::new(SentimentLabel::Negative, 90.0)
        );
        assert_eq!(
            heuristic("I will call tomorrow"),
            Sentiment::new(SentimentLabel::Neutral, 50.0)
        );
    }

    #[test]
    fn test_symptom_beats_positive_words() {
        assert_eq!(heuristic("great, now I have a migraine").label, SentimentLabel::Negative);
    }

    #[test]
    fn test_normalize_scales_and_clamps() {
        let raw = RawSentiment {
            label: "positive".into(),
            confidence: 0.98766,
        };
        assert_eq!(
            normalize(&raw, "thanks"),
            Sentiment::new(SentimentLabel::Positive, 98.77)
        );

        let raw = RawSentiment {
            label: "neutral".into(),
            confidence: 0.001,
        };
        assert_eq!(normalize(&raw, "ok").score, 1.0);
    }

    #[test]
    fn test_non_finite_confidence_uses_keywords() {
        for confidence in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let raw = RawSentiment {
                label: "positive".into(),
                confidence,
            };
            let sentiment = normalize(&raw, "what a lovely day");
            assert_eq!(sentiment, heuristic("what a lovely day"));
            assert!(sentiment.score.is_finite());
        }

        let raw = RawSentiment {
            label: "positive".into(),
            confidence: f64::NAN,
        };
        let sentiment = normalize(&raw, "I feel nauseous");
        assert_eq!(sentiment.label, SentimentLabel::Negative);
        assert!(sentiment.score >= 80.0);
    }

    #[tokio::test]
    async fn test_symptom_override_on_model_output() {
        let classifier = SentimentClassifier::with_model(Arc::new(FixedModel("positive", 0.6)));
        let sentiment = classifier.analyze("I love this but my headache is back").await;
        assert_eq!(sentiment.label, SentimentLabel::Negative);
        assert_eq!(sentiment.score, 80.0);

        let classifier = SentimentClassifier::with_model(Arc::new(FixedModel("negative", 0.97)));
        let sentiment = classifier.analyze("I feel dizzy").await;
        assert_eq!(sentiment, Sentiment::new(SentimentLabel::Negative, 97.0));
    }

    #[tokio::test]
    async fn test_symptom_always_negative_at_least_80() {
        let classifier = SentimentClassifier::with_model(Arc::new(FixedModel("LABEL_2", 0.99)));
        for term in SYMPTOM_TERMS {
            let text = format!("today: {term}");
            let sentiment = classifier.analyze(&text).await;
            assert_eq!(sentiment.label, SentimentLabel::Negative, "{text}");
            assert!(sentiment.score >= 80.0, "{text}");

            let sentiment = heuristic(&text);
            assert_eq!(sentiment.label, SentimentLabel::Negative, "{text}");
            assert!(sentiment.score >= 80.0, "{text}");
        }
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let classifier = SentimentClassifier::with_model(Arc::new(BrokenModel));
        assert_eq!(
            classifier.analyze("so happy").await,
            Sentiment::new(SentimentLabel::Positive, 90.0)
        );
    }

    #[tokio::test]
    async fn test_hugging_face_picks_best_label() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/cardiffnlp/twitter-roberta-base-sentiment-latest")
            .match_header("authorization", "Bearer hf-token")
            .with_status(200)
            .with_body(
                r#"[[{"label":"negative","score":0.1},{"label":"neutral","score":0.2},{"label":"positive","score":0.7}]]"#,
            )
            .expect(1)
            .create_async()
            .await;

        let model =
            HuggingFaceSentiment::new(HuggingFaceConfig::new("hf-token").with_api_url(server.url()))
                .unwrap();
        let raw = model.classify("lovely day").await.unwrap();

        assert_eq!(raw.label, "positive");
        assert_eq!(raw.confidence, 0.7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hugging_face_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(503)
            .with_body("loading")
            .create_async()
            .await;

        let model =
            HuggingFaceSentiment::new(HuggingFaceConfig::new("t").with_api_url(server.url()))
                .unwrap();
        assert!(matches!(
            model.classify("x").await,
            Err(SentimentError::Status { status: 503, .. })
        ));
    }
}
