//! Route handlers for the HTTP API.

pub mod admin;
pub mod chat;
pub mod conversations;
pub mod health;
pub mod profile;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest page size accepted by list endpoints.
pub const MAX_LIMIT: i64 = 200;

/// Build the router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        // Chat
        .route("/api/chat", post(chat::send))
        .route("/api/chat/history", get(chat::history))
        .route(
            "/api/chat/conversations",
            get(conversations::list).post(conversations::create),
        )
        .route(
            "/api/chat/conversations/:id",
            put(conversations::rename).delete(conversations::delete),
        )
        // Profile
        .route("/api/user/profile", get(profile::show).put(profile::update))
        // Admin
        .route("/api/admin/recent_chats", get(admin::recent_chats))
        .route("/api/admin/alerts", get(admin::alerts))
        .route("/api/admin/alerts/:id/acknowledge", post(admin::acknowledge))
        .route("/api/admin/providers", get(admin::providers))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Parse a `limit` query value, clamped to `1..=MAX_LIMIT`. Missing or
/// unparseable values use `default`.
pub(crate) fn parse_limit(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
        .clamp(1, MAX_LIMIT)
}

/// Parse an optional id filter. Unparseable values are ignored.
pub(crate) fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use database::{user, Database};
    use http_body_util::BodyExt;
    use orchestrator::{ChatConfig, Orchestrator, ProviderRegistry, SentimentClassifier};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::auth::{ADMIN_KEY_HEADER, USER_ID_HEADER};
    use crate::state::AppState;

    pub const ADMIN_KEY: &str = "test-admin";

    /// State over a fresh in-memory database with one user and no providers.
    pub async fn test_state() -> (AppState, i64) {
        test_state_with(ProviderRegistry::empty()).await
    }

    pub async fn test_state_with(registry: ProviderRegistry) -> (AppState, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let user = user::create_user(db.pool(), "sara@example.com", "hash")
            .await
            .unwrap();

        let orchestrator = Orchestrator::new(
            db.pool().clone(),
            Arc::new(registry),
            SentimentClassifier::heuristic_only(),
            ChatConfig::default(),
        );

        (AppState::new(db, orchestrator, ADMIN_KEY), user.id)
    }

    pub fn request(method: &str, uri: &str, user_id: Option<i64>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(id) = user_id {
            builder = builder.header(USER_ID_HEADER, id.to_string());
        }

        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub fn admin_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(ADMIN_KEY_HEADER, ADMIN_KEY)
            .body(Body::empty())
            .unwrap()
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None, 50), 50);
        assert_eq!(parse_limit(Some("10"), 50), 10);
        assert_eq!(parse_limit(Some("0"), 50), 1);
        assert_eq!(parse_limit(Some("5000"), 50), 200);
        assert_eq!(parse_limit(Some("lots"), 20), 20);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some(" 7 ")), Some(7));
        assert_eq!(parse_id(Some("x")), None);
        assert_eq!(parse_id(None), None);
    }
}
