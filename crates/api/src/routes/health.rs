//! Liveness endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// Plain-text liveness probe.
pub async fn ping() -> &'static str {
    "pong"
}

/// Health check endpoint.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
