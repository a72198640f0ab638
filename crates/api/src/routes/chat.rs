//! Chat endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use database::{chat_history, ChatHistoryEntry};
use orchestrator::{ChatRequest, ChatResponse};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::routes::{parse_id, parse_limit};
use crate::state::AppState;

/// Default page size for `/api/chat/history`.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<i64>,
}

/// Send a message and receive the assistant's reply.
pub async fn send(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: std::result::Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let request = ChatRequest {
        user_id,
        message: body.message.unwrap_or_default(),
        conversation_id: body.conversation_id,
    };

    let response = state.orchestrator.process(request).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SentimentView {
    pub label: String,
    pub score: f64,
}

/// One turn as shown in the chat window.
#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub conversation_id: Option<i64>,
    pub user: String,
    pub ai: String,
    pub sentiment: SentimentView,
    pub created_at: String,
}

impl From<ChatHistoryEntry> for HistoryItem {
    fn from(entry: ChatHistoryEntry) -> Self {
        Self {
            id: entry.id,
            conversation_id: entry.conversation_id,
            user: entry.user_message,
            ai: entry.ai_response,
            sentiment: SentimentView {
                label: entry.sentiment_label,
                score: entry.sentiment_score,
            },
            created_at: entry.created_at,
        }
    }
}

/// The caller's history, oldest first.
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryItem>>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_HISTORY_LIMIT);
    let conversation_id = parse_id(params.conversation_id.as_deref());

    let rows = chat_history::list_for_user(state.db.pool(), user_id, conversation_id, limit).await?;
    Ok(Json(rows.into_iter().map(HistoryItem::from).collect()))
}
