//! Profile endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use database::{profile, Profile, ProfileUpdate};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

/// The caller's profile, created with defaults on first read.
pub async fn show(State(state): State<AppState>, AuthUser(user_id): AuthUser) -> Result<Json<Profile>> {
    let profile = profile::ensure_profile(state.db.pool(), user_id).await?;
    Ok(Json(profile))
}

/// Partially update the caller's profile. Absent fields keep their value.
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(update) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let profile = profile::update_profile(state.db.pool(), user_id, &update).await?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "profile": profile,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::router;
    use crate::routes::test_support::{request, send, test_state};

    #[tokio::test]
    async fn test_get_creates_default_profile() {
        let (state, user_id) = test_state().await;

        let (status, body) = send(
            router(state),
            request("GET", "/api/user/profile", Some(user_id), None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response_style"], "concise");
        assert!(body["name"].is_null());
        assert!(body.get("user_id").is_none());
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (state, user_id) = test_state().await;

        let (status, _) = send(
            router(state.clone()),
            request(
                "PUT",
                "/api/user/profile",
                Some(user_id),
                Some(json!({"name": "Sara", "age": 34})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            router(state.clone()),
            request(
                "PUT",
                "/api/user/profile",
                Some(user_id),
                Some(json!({"response_style": "detailed"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Profile updated successfully");

        let (_, profile) = send(
            router(state),
            request("GET", "/api/user/profile", Some(user_id), None),
        )
        .await;
        assert_eq!(profile["name"], "Sara");
        assert_eq!(profile["age"], 34);
        assert_eq!(profile["response_style"], "detailed");
    }

    #[tokio::test]
    async fn test_invalid_update_is_bad_request() {
        let (state, user_id) = test_state().await;

        for body in [
            json!({"response_style": "verbose"}),
            json!({"age": 200}),
            json!({"weight": 0}),
        ] {
            let (status, json) = send(
                router(state.clone()),
                request("PUT", "/api/user/profile", Some(user_id), Some(body)),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["message"].is_string());
        }
    }
}
