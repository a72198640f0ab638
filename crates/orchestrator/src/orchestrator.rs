//! The per-message chat pipeline.

use std::sync::Arc;

use database::{alert, chat_history, conversation, AlertType, NewChatEntry, SqlitePool};
use provider_core::hash_prompt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ChatConfig;
use crate::error::OrchestratorError;
use crate::fallback;
use crate::intent::Intent;
use crate::profile_context::ProfileContext;
use crate::prompt::{compose, format_history};
use crate::registry::ProviderRegistry;
use crate::sentiment::{Sentiment, SentimentClassifier, SentimentLabel};

/// Alert text for an urgent message.
pub const URGENT_ALERT_MESSAGE: &str = "Immediate urgent help trigger from user message.";

/// Alert text for consecutive high-severity negative messages.
pub const MENTAL_HEALTH_ALERT_MESSAGE: &str =
    "Consecutive high-severity negative sentiments detected. Please check in with the user.";

/// One incoming chat message from an authenticated user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatRequest {
    pub user_id: i64,
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

impl ChatRequest {
    pub fn new(user_id: i64, message: impl Into<String>) -> Self {
        Self {
            user_id,
            message: message.into(),
            conversation_id: None,
        }
    }

    /// Attach the message to a conversation.
    pub fn in_conversation(mut self, conversation_id: i64) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }
}

/// Alert raised while handling a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub alert_id: i64,
    pub message: String,
}

/// Result of handling one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub user_message: String,
    pub ai_response: String,
    pub sentiment: Sentiment,
    pub alert: Option<AlertInfo>,
}

/// Coordinates intent detection, sentiment, prompting, generation,
/// persistence and alerting for each message.
///
/// Cheap to clone; the provider registry is shared.
#[derive(Clone)]
pub struct Orchestrator {
    pool: SqlitePool,
    registry: Arc<ProviderRegistry>,
    classifier: SentimentClassifier,
    config: ChatConfig,
}

impl Orchestrator {
    /// Create an orchestrator from its parts.
    pub fn new(
        pool: SqlitePool,
        registry: Arc<ProviderRegistry>,
        classifier: SentimentClassifier,
        config: ChatConfig,
    ) -> Self {
        Self {
            pool,
            registry,
            classifier,
            config,
        }
    }

    /// Create an orchestrator with providers, sentiment model and limits
    /// taken from environment variables.
    pub fn from_env(pool: SqlitePool) -> Self {
        Self::new(
            pool,
            Arc::new(ProviderRegistry::from_env()),
            SentimentClassifier::from_env(),
            ChatConfig::from_env(),
        )
    }

    /// The shared provider registry.
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The pipeline configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Handle one message.
    ///
    /// Only an empty message is an error. Provider, storage and alert
    /// failures are logged and the computed reply is still returned.
    pub async fn process(&self, request: ChatRequest) -> Result<ChatResponse, OrchestratorError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(OrchestratorError::EmptyMessage);
        }

        let user_id = request.user_id;
        let intent = Intent::detect(message);
        debug!(user_id, ?intent, "Processing message");

        let profile = ProfileContext::load(&self.pool, user_id).await;
        let conversation_id = self
            .owned_conversation(user_id, request.conversation_id)
            .await;

        let (ai_response, sentiment, alert) = match intent {
            Intent::Greeting => {
                let sentiment = Sentiment::greeting();
                let reply = self
                    .generate_or(message, "", &profile, &sentiment, intent, || {
                        fallback::greeting_reply(&profile)
                    })
                    .await;
                self.store(user_id, conversation_id, message, &reply, &sentiment)
                    .await;
                (reply, sentiment, None)
            }
            Intent::Urgent => {
                let sentiment = Sentiment::urgent();
                let reply = self
                    .generate_or(message, "", &profile, &sentiment, intent, || {
                        fallback::crisis_reply(&profile)
                    })
                    .await;
                let alert = if self
                    .store(user_id, conversation_id, message, &reply, &sentiment)
                    .await
                {
                    self.raise_alert(user_id, AlertType::Urgent, URGENT_ALERT_MESSAGE)
                        .await
                } else {
                    None
                };
                (reply, sentiment, alert)
            }
            Intent::Normal => {
                let sentiment = self.classifier.analyze(message).await;
                let history_text = self.history_text(user_id, conversation_id).await;
                let reply = self
                    .generate_or(message, &history_text, &profile, &sentiment, intent, || {
                        fallback::generate(message, &sentiment, &history_text, &profile)
                    })
                    .await;
                let alert = if self
                    .store(user_id, conversation_id, message, &reply, &sentiment)
                    .await
                {
                    self.check_mental_health_risk(user_id).await
                } else {
                    None
                };
                (reply, sentiment, alert)
            }
        };

        Ok(ChatResponse {
            user_message: message.to_string(),
            ai_response,
            sentiment,
            alert,
        })
    }

    async fn generate_or<F>(
        &self,
        message: &str,
        history_text: &str,
        profile: &ProfileContext,
        sentiment: &Sentiment,
        intent: Intent,
        otherwise: F,
    ) -> String
    where
        F: FnOnce() -> String,
    {
        let request = compose(message, history_text, profile, sentiment, intent).into_request();
        debug!(
            ?intent,
            system_prompt = %hash_prompt(&request.system),
            "Composed prompt"
        );
        match self.registry.generate(&request).await {
            Some(reply) => reply,
            None => {
                info!(?intent, "No provider reply, using rule-based response");
                otherwise()
            }
        }
    }

    /// Keep a conversation id only when it belongs to the user.
    async fn owned_conversation(&self, user_id: i64, conversation_id: Option<i64>) -> Option<i64> {
        let id = conversation_id?;
        match conversation::find_conversation(&self.pool, user_id, id).await {
            Ok(Some(conversation)) => Some(conversation.id),
            Ok(None) => {
                debug!(user_id, conversation_id = id, "Ignoring foreign conversation");
                None
            }
            Err(e) => {
                warn!(user_id, "Failed to look up conversation: {}", e);
                None
            }
        }
    }

    async fn history_text(&self, user_id: i64, conversation_id: Option<i64>) -> String {
        match chat_history::recent_for_user(
            &self.pool,
            user_id,
            conversation_id,
            self.config.history_turns,
        )
        .await
        {
            Ok(entries) => format_history(&entries),
            Err(e) => {
                warn!(user_id, "Failed to read chat history: {}", e);
                String::new()
            }
        }
    }

    /// Persist the turn. Returns whether it was stored.
    async fn store(
        &self,
        user_id: i64,
        conversation_id: Option<i64>,
        message: &str,
        reply: &str,
        sentiment: &Sentiment,
    ) -> bool {
        let entry = NewChatEntry {
            user_id,
            conversation_id,
            user_message: message.to_string(),
            ai_response: reply.to_string(),
            sentiment_label: sentiment.label.as_str().to_string(),
            sentiment_score: sentiment.score,
        };

        match chat_history::insert_entry(&self.pool, &entry).await {
            Ok(stored) => {
                debug!(user_id, entry_id = stored.id, "Stored chat turn");
                true
            }
            Err(e) => {
                warn!(user_id, "Failed to store chat turn: {}", e);
                false
            }
        }
    }

    async fn raise_alert(
        &self,
        user_id: i64,
        alert_type: AlertType,
        message: &str,
    ) -> Option<AlertInfo> {
        match alert::create_alert(&self.pool, user_id, alert_type, message).await {
            Ok(alert) => {
                info!(user_id, alert_id = alert.id, %alert_type, "Alert raised");
                Some(AlertInfo {
                    alert_id: alert.id,
                    message: alert.message,
                })
            }
            Err(e) => {
                warn!(user_id, %alert_type, "Failed to create alert: {}", e);
                None
            }
        }
    }

    /// Raise a mental-health alert when the user's two latest turns are
    /// both strongly negative.
    async fn check_mental_health_risk(&self, user_id: i64) -> Option<AlertInfo> {
        let latest = match chat_history::latest_for_user(&self.pool, user_id, 2).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(user_id, "Failed to read recent sentiment: {}", e);
                return None;
            }
        };

        let at_risk = latest.len() == 2
            && latest.iter().all(|row| {
                SentimentLabel::from_raw(&row.sentiment_label) == SentimentLabel::Negative
                    && row.sentiment_score >= self.config.alert_threshold
            });

        if !at_risk {
            return None;
        }

        self.raise_alert(
            user_id,
            AlertType::MentalHealthRisk,
            MENTAL_HEALTH_ALERT_MESSAGE,
        )
        .await
    }
}
