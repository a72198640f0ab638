//! Profile storage.
//!
//! Profiles are created lazily with default values the first time they
//! are read, and change only through [`update_profile`].

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Profile;
use crate::validation::{validate_age, validate_name, validate_response_style, validate_weight};

const PROFILE_COLUMNS: &str = "id, user_id, name, age, gender, weight, health_conditions, \
    birthmarks, family_medication_history, previous_medication_history, response_style";

/// Partial profile update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub health_conditions: Option<String>,
    pub birthmarks: Option<String>,
    pub family_medication_history: Option<String>,
    pub previous_medication_history: Option<String>,
    pub response_style: Option<String>,
}

impl ProfileUpdate {
    /// Check every present field.
    pub fn validate(&self) -> std::result::Result<(), crate::ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        if let Some(style) = &self.response_style {
            validate_response_style(style)?;
        }
        Ok(())
    }
}

/// Get a user's profile, if one exists.
pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> Result<Option<Profile>> {
    let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = ?");
    let profile = sqlx::query_as::<_, Profile>(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(profile)
}

/// Get a user's profile, creating an empty one when missing.
pub async fn ensure_profile(pool: &SqlitePool, user_id: i64) -> Result<Profile> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id)
        VALUES (?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    get_profile(pool, user_id)
        .await?
        .ok_or_else(|| crate::DatabaseError::not_found("Profile", user_id))
}

/// Apply a partial update and return the stored profile.
///
/// Creates the profile first if it does not exist.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<Profile> {
    update.validate()?;
    ensure_profile(pool, user_id).await?;

    sqlx::query(
        r#"
        UPDATE profiles SET
            name = COALESCE(?, name),
            age = COALESCE(?, age),
            gender = COALESCE(?, gender),
            weight = COALESCE(?, weight),
            health_conditions = COALESCE(?, health_conditions),
            birthmarks = COALESCE(?, birthmarks),
            family_medication_history = COALESCE(?, family_medication_history),
            previous_medication_history = COALESCE(?, previous_medication_history),
            response_style = COALESCE(?, response_style)
        WHERE user_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(update.age)
    .bind(&update.gender)
    .bind(update.weight)
    .bind(&update.health_conditions)
    .bind(&update.birthmarks)
    .bind(&update.family_medication_history)
    .bind(&update.previous_medication_history)
    .bind(&update.response_style)
    .bind(user_id)
    .execute(pool)
    .await?;

    tracing::debug!(user_id, "Profile updated");

    ensure_profile(pool, user_id).await
}
