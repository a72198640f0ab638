//! User operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;
use crate::validation::validate_email;

/// Create a new user and return it.
pub async fn create_user(pool: &SqlitePool, email: &str, password_hash: &str) -> Result<User> {
    validate_email(email)?;
    let email = email.trim().to_lowercase();

    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES (?, ?)
        "#,
    )
    .bind(&email)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_user(pool, result.last_insert_rowid()).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", id))
}

/// Get a user by email (case-insensitive).
pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<User> {
    let email = email.trim().to_lowercase();
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password_hash, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", email))
}

/// Whether a user with this ID exists.
pub async fn user_exists(pool: &SqlitePool, id: i64) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(exists != 0)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = test_db().await;

        let user = create_user(db.pool(), "Alice@Example.com", "hash")
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");

        let fetched = get_user(db.pool(), user.id).await.unwrap();
        assert_eq!(fetched, user);

        let by_email = get_user_by_email(db.pool(), "ALICE@example.com")
            .await
            .unwrap();
        assert_eq!(by_email.id, user.id);

        assert!(user_exists(db.pool(), user.id).await.unwrap());
        assert_eq!(count_users(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = test_db().await;
        create_user(db.pool(), "bob@example.com", "h").await.unwrap();

        let result = create_user(db.pool(), "bob@example.com", "h").await;
        assert!(matches!(result, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let db = test_db().await;
        let result = create_user(db.pool(), "not-an-email", "h").await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let db = test_db().await;
        assert!(!user_exists(db.pool(), 42).await.unwrap());
        assert!(matches!(
            get_user(db.pool(), 42).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
