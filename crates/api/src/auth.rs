//! Request identity.
//!
//! Users are authenticated upstream; the proxy forwards the user id in
//! [`USER_ID_HEADER`]. Admin routes check a shared key instead.

use axum::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use database::user;
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// An authenticated, existing user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or(ApiError::Unauthorized)?;

        if !user::user_exists(state.db.pool(), user_id).await? {
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser(user_id))
    }
}

#[derive(Debug, Deserialize)]
struct AdminKeyQuery {
    admin_key: Option<String>,
}

/// Proof that the request carried the admin key, in the `X-ADMIN-KEY`
/// header or the `admin_key` query parameter.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let provided = match from_header {
            Some(key) => Some(key),
            None => Query::<AdminKeyQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.admin_key),
        };

        match provided {
            Some(key) if keys_match(&key, &state.admin_key) => Ok(AdminAuth),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Compare keys in constant time for equal lengths.
fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match("s3cret", "s3cret"));
        assert!(!keys_match("s3cres", "s3cret"));
        assert!(!keys_match("s3cret-longer", "s3cret"));
        assert!(!keys_match("", "s3cret"));
    }
}
