//! Structured profile context for prompts and templates.

use std::fmt;

use database::{profile, Profile, SqlitePool};
use serde::Serialize;
use tracing::warn;

use crate::text::{format_decimal, is_meaningful};

/// Preferred reply verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Concise,
    Detailed,
}

impl ResponseStyle {
    /// Parse a stored style. Anything but `detailed` is concise.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("detailed") {
            ResponseStyle::Detailed
        } else {
            ResponseStyle::Concise
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStyle::Concise => "concise",
            ResponseStyle::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of a profile that personalize replies.
///
/// Placeholder values (`none`, `n/a`, blank) are dropped when the context
/// is built, so every `Some` field carries real information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileContext {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub health_conditions: Option<String>,
    pub previous_medication_history: Option<String>,
    pub family_medication_history: Option<String>,
    pub response_style: ResponseStyle,
}

fn meaningful(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| is_meaningful(v))
        .map(|v| v.trim().to_string())
}

impl ProfileContext {
    /// Context with no personalization.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Extract the context from a stored profile.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: meaningful(&profile.name),
            age: profile.age.filter(|age| *age > 0),
            gender: meaningful(&profile.gender),
            weight: profile.weight.filter(|w| *w > 0.0),
            health_conditions: meaningful(&profile.health_conditions),
            previous_medication_history: meaningful(&profile.previous_medication_history),
            family_medication_history: meaningful(&profile.family_medication_history),
            response_style: ResponseStyle::parse(&profile.response_style),
        }
    }

    /// Load a user's context. A missing profile or a read failure yields
    /// an empty context.
    pub async fn load(pool: &SqlitePool, user_id: i64) -> Self {
        match profile::get_profile(pool, user_id).await {
            Ok(Some(profile)) => Self::from_profile(&profile),
            Ok(None) => Self::empty(),
            Err(e) => {
                warn!(user_id, "Failed to read profile: {}", e);
                Self::empty()
            }
        }
    }

    /// Whether the rendered block would be empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
            && self.health_conditions.is_none()
            && self.previous_medication_history.is_none()
            && self.family_medication_history.is_none()
    }

    /// Render the labeled natural-language block used in prompts.
    /// Empty when there is nothing to say.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if let Some(name) = &self.name {
            sections.push(format!("Patient Name: {name}"));
        }
        if let Some(age) = self.age {
            sections.push(format!("Age: {age} years"));
        }
        if let Some(gender) = &self.gender {
            sections.push(format!("Gender: {gender}"));
        }
        if let Some(weight) = self.weight {
            sections.push(format!("Weight: {} kg", format_decimal(weight)));
        }
        if let Some(conditions) = &self.health_conditions {
            sections.push(format!("\nCurrent Health Conditions:\n{conditions}"));
        }
        if let Some(history) = &self.previous_medication_history {
            sections.push(format!("\nPatient's Previous Medication History:\n{history}"));
        }
        if let Some(family) = &self.family_medication_history {
            sections.push(format!("\nFamily Medication/Medical History:\n{family}"));
        }

        if sections.is_empty() {
            return String::new();
        }

        format!(
            "{}\n\nResponse Style Preference: {}",
            sections.join("\n"),
            self.response_style
        )
    }
}
