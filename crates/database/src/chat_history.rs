//! Chat history: one append-only row per exchanged turn.
//!
//! "Recent" always means `created_at DESC, id DESC`; the id breaks ties
//! between rows written within the same second.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::ChatHistoryEntry;

/// A turn to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChatEntry {
    pub user_id: i64,
    pub conversation_id: Option<i64>,
    pub user_message: String,
    pub ai_response: String,
    pub sentiment_label: String,
    pub sentiment_score: f64,
}

/// Store a turn.
///
/// When the turn belongs to a conversation, that conversation's
/// `updated_at` is bumped in the same transaction. On any error the
/// transaction is rolled back.
pub async fn insert_entry(pool: &SqlitePool, entry: &NewChatEntry) -> Result<ChatHistoryEntry> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        INSERT INTO chat_history
            (user_id, conversation_id, user_message, ai_response, sentiment_label, sentiment_score)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.conversation_id)
    .bind(&entry.user_message)
    .bind(&entry.ai_response)
    .bind(&entry.sentiment_label)
    .bind(entry.sentiment_score)
    .execute(&mut *tx)
    .await?;

    if let Some(conversation_id) = entry.conversation_id {
        sqlx::query(
            r#"
            UPDATE conversations
            SET updated_at = datetime('now')
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(conversation_id)
        .bind(entry.user_id)
        .execute(&mut *tx)
        .await?;
    }

    let stored = sqlx::query_as::<_, ChatHistoryEntry>(
        r#"
        SELECT id, user_id, conversation_id, user_message, ai_response,
               sentiment_label, sentiment_score, created_at
        FROM chat_history
        WHERE id = ?
        "#,
    )
    .bind(result.last_insert_rowid())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(stored)
}

/// The `limit` most recent turns for a user, newest first, across all
/// conversations.
pub async fn latest_for_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<ChatHistoryEntry>> {
    let rows = sqlx::query_as::<_, ChatHistoryEntry>(
        r#"
        SELECT id, user_id, conversation_id, user_message, ai_response,
               sentiment_label, sentiment_score, created_at
        FROM chat_history
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// The `limit` most recent turns, optionally within one conversation,
/// returned oldest first.
pub async fn recent_for_user(
    pool: &SqlitePool,
    user_id: i64,
    conversation_id: Option<i64>,
    limit: i64,
) -> Result<Vec<ChatHistoryEntry>> {
    let mut rows = sqlx::query_as::<_, ChatHistoryEntry>(
        r#"
        SELECT id, user_id, conversation_id, user_message, ai_response,
               sentiment_label, sentiment_score, created_at
        FROM chat_history
        WHERE user_id = ? AND (? IS NULL OR conversation_id = ?)
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(conversation_id)
    .bind(conversation_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.reverse();
    Ok(rows)
}

/// A user's history from the beginning, oldest first, at most `limit` rows.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    conversation_id: Option<i64>,
    limit: i64,
) -> Result<Vec<ChatHistoryEntry>> {
    let rows = sqlx::query_as::<_, ChatHistoryEntry>(
        r#"
        SELECT id, user_id, conversation_id, user_message, ai_response,
               sentiment_label, sentiment_score, created_at
        FROM chat_history
        WHERE user_id = ? AND (? IS NULL OR conversation_id = ?)
        ORDER BY created_at ASC, id ASC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(conversation_id)
    .bind(conversation_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Recent turns across all users (or one user), newest first.
pub async fn list_recent(
    pool: &SqlitePool,
    user_id: Option<i64>,
    limit: i64,
) -> Result<Vec<ChatHistoryEntry>> {
    let rows = sqlx::query_as::<_, ChatHistoryEntry>(
        r#"
        SELECT id, user_id, conversation_id, user_message, ai_response,
               sentiment_label, sentiment_score, created_at
        FROM chat_history
        WHERE (? IS NULL OR user_id = ?)
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count a user's stored turns.
pub async fn count_for_user(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_history WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
