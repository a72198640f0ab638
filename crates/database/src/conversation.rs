//! Conversation threads.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Conversation;
use crate::validation::normalize_title;

/// Title given to conversations created without one.
pub const DEFAULT_TITLE: &str = "New chat";

/// Create a conversation. A blank or missing title becomes [`DEFAULT_TITLE`].
pub async fn create_conversation(
    pool: &SqlitePool,
    user_id: i64,
    title: Option<&str>,
) -> Result<Conversation> {
    let title = normalize_title(title)?;

    let result = sqlx::query(
        r#"
        INSERT INTO conversations (user_id, title)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&title)
    .execute(pool)
    .await?;

    get_conversation(pool, user_id, result.last_insert_rowid()).await
}

/// Get a conversation owned by `user_id`.
pub async fn get_conversation(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Conversation> {
    find_conversation(pool, user_id, id)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Conversation", id))
}

/// Get a conversation owned by `user_id`, or `None`.
pub async fn find_conversation(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
) -> Result<Option<Conversation>> {
    let conversation = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(conversation)
}

/// List a user's conversations, most recently updated first.
pub async fn list_conversations(pool: &SqlitePool, user_id: i64) -> Result<Vec<Conversation>> {
    let conversations = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, user_id, title, created_at, updated_at
        FROM conversations
        WHERE user_id = ?
        ORDER BY updated_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(conversations)
}

/// Rename a conversation. A blank title keeps the current one.
/// Always bumps `updated_at`.
pub async fn rename_conversation(
    pool: &SqlitePool,
    user_id: i64,
    id: i64,
    title: Option<&str>,
) -> Result<Conversation> {
    let new_title = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => Some(normalize_title(Some(t))?),
        None => None,
    };

    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET title = COALESCE(?, title), updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(new_title)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Conversation", id));
    }

    get_conversation(pool, user_id, id).await
}

/// Delete a conversation. Its chat rows are kept with the link cleared.
pub async fn delete_conversation(pool: &SqlitePool, user_id: i64, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Conversation", id));
    }

    Ok(())
}
