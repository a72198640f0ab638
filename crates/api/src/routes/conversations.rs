//! Conversation thread endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{conversation, Conversation};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TitleBody {
    #[serde(default)]
    pub title: Option<String>,
}

/// The caller's conversations, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Conversation>>> {
    let conversations = conversation::list_conversations(state.db.pool(), user_id).await?;
    Ok(Json(conversations))
}

/// Start a conversation. The body and title are optional.
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Option<Json<TitleBody>>,
) -> Result<(StatusCode, Json<Conversation>)> {
    let title = body.and_then(|Json(b)| b.title);
    let created =
        conversation::create_conversation(state.db.pool(), user_id, title.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Rename a conversation; a missing or blank title only bumps `updated_at`.
pub async fn rename(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    body: Option<Json<TitleBody>>,
) -> Result<Json<Conversation>> {
    let title = body.and_then(|Json(b)| b.title);
    let updated =
        conversation::rename_conversation(state.db.pool(), user_id, id, title.as_deref()).await?;
    Ok(Json(updated))
}

/// Delete a conversation. Its chat turns are kept.
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    conversation::delete_conversation(state.db.pool(), user_id, id).await?;
    Ok(Json(json!({ "message": "Deleted" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use database::user;
    use serde_json::json;

    use crate::routes::router;
    use crate::routes::test_support::{request, send, test_state};

    #[tokio::test]
    async fn test_create_list_rename_delete() {
        let (state, user_id) = test_state().await;

        let (status, created) = send(
            router(state.clone()),
            request("POST", "/api/chat/conversations", Some(user_id), None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "New chat");
        assert!(created.get("user_id").is_none());
        let id = created["id"].as_i64().unwrap();

        let (status, renamed) = send(
            router(state.clone()),
            request(
                "PUT",
                &format!("/api/chat/conversations/{id}"),
                Some(user_id),
                Some(json!({"title": "Migraines"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["title"], "Migraines");

        let (_, listed) = send(
            router(state.clone()),
            request("GET", "/api/chat/conversations", Some(user_id), None),
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["title"], "Migraines");

        let (status, body) = send(
            router(state.clone()),
            request(
                "DELETE",
                &format!("/api/chat/conversations/{id}"),
                Some(user_id),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Deleted");

        let (_, listed) = send(
            router(state),
            request("GET", "/api/chat/conversations", Some(user_id), None),
        )
        .await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_conversation_is_not_found() {
        let (state, user_id) = test_state().await;
        let other = user::create_user(state.db.pool(), "other@example.com", "hash")
            .await
            .unwrap();

        let (_, created) = send(
            router(state.clone()),
            request(
                "POST",
                "/api/chat/conversations",
                Some(other.id),
                Some(json!({"title": "Private"})),
            ),
        )
        .await;
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            router(state.clone()),
            request(
                "PUT",
                &format!("/api/chat/conversations/{id}"),
                Some(user_id),
                Some(json!({"title": "Mine now"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            router(state),
            request(
                "DELETE",
                &format!("/api/chat/conversations/{id}"),
                Some(user_id),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
