//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An account, provisioned by the upstream credential service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Opaque credential hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: String,
}

/// Demographic and medical profile. At most one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    pub health_conditions: Option<String>,
    pub birthmarks: Option<String>,
    pub family_medication_history: Option<String>,
    pub previous_medication_history: Option<String>,
    /// `concise` or `detailed`.
    pub response_style: String,
}

/// A named chat thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One exchanged turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub conversation_id: Option<i64>,
    pub user_message: String,
    pub ai_response: String,
    pub sentiment_label: String,
    /// 0-100.
    pub sentiment_score: f64,
    pub created_at: String,
}

/// Kind of alert raised by the chat pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Urgent or self-harm language in a single message.
    Urgent,
    /// Consecutive high-severity negative messages.
    MentalHealthRisk,
}

impl AlertType {
    /// Column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Urgent => "urgent",
            AlertType::MentalHealthRisk => "mental_health_risk",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A derived event for staff review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: i64,
    pub user_id: i64,
    pub alert_type: String,
    pub message: String,
    pub acknowledged: bool,
    pub created_at: String,
}
