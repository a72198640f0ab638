//! Staff endpoints. Every handler requires the admin key.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::{alert, chat_history, Alert, ChatHistoryEntry};
use orchestrator::ProviderStatus;
use serde::Deserialize;

use crate::auth::AdminAuth;
use crate::error::Result;
use crate::routes::{parse_id, parse_limit};
use crate::state::AppState;

/// Default page size for recent chats.
pub const DEFAULT_RECENT_CHATS_LIMIT: i64 = 20;

/// Default page size for alerts.
pub const DEFAULT_ALERTS_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub user_id: Option<String>,
}

/// Recent chat turns across users, newest first.
pub async fn recent_chats(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ChatHistoryEntry>>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_RECENT_CHATS_LIMIT);
    let user_id = parse_id(params.user_id.as_deref());

    let rows = chat_history::list_recent(state.db.pool(), user_id, limit).await?;
    Ok(Json(rows))
}

/// Recent alerts, newest first.
pub async fn alerts(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Alert>>> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_ALERTS_LIMIT);
    let user_id = parse_id(params.user_id.as_deref());

    let rows = alert::list_alerts(state.db.pool(), user_id, limit).await?;
    Ok(Json(rows))
}

/// Mark an alert as handled.
pub async fn acknowledge(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Alert>> {
    let alert = alert::acknowledge_alert(state.db.pool(), id).await?;
    Ok(Json(alert))
}

/// Provider availability as last probed.
pub async fn providers(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> Json<Vec<ProviderStatus>> {
    Json(state.orchestrator.registry().snapshot().await)
}
