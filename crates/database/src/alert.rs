//! Alerts raised by the chat pipeline.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Alert, AlertType};

/// Create an alert and return it.
pub async fn create_alert(
    pool: &SqlitePool,
    user_id: i64,
    alert_type: AlertType,
    message: &str,
) -> Result<Alert> {
    let result = sqlx::query(
        r#"
        INSERT INTO alerts (user_id, alert_type, message)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(alert_type.as_str())
    .bind(message)
    .execute(pool)
    .await?;

    get_alert(pool, result.last_insert_rowid()).await
}

/// Get an alert by ID.
pub async fn get_alert(pool: &SqlitePool, id: i64) -> Result<Alert> {
    sqlx::query_as::<_, Alert>(
        r#"
        SELECT id, user_id, alert_type, message, acknowledged, created_at
        FROM alerts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Alert", id))
}

/// Recent alerts, newest first, optionally for one user.
pub async fn list_alerts(pool: &SqlitePool, user_id: Option<i64>, limit: i64) -> Result<Vec<Alert>> {
    let alerts = sqlx::query_as::<_, Alert>(
        r#"
        SELECT id, user_id, alert_type, message, acknowledged, created_at
        FROM alerts
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

    Ok(alerts)
}

/// Count alerts of a given type for a user.
pub async fn count_alerts(pool: &SqlitePool, user_id: i64, alert_type: AlertType) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM alerts WHERE user_id = ? AND alert_type = ?
        "#,
    )
    .bind(user_id)
    .bind(alert_type.as_str())
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Mark an alert as acknowledged.
pub async fn acknowledge_alert(pool: &SqlitePool, id: i64) -> Result<Alert> {
    let result = sqlx::query(
        r#"
        UPDATE alerts SET acknowledged = 1 WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Alert", id));
    }

    get_alert(pool, id).await
}
