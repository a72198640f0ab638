//! Input validation for user-supplied fields.

use thiserror::Error;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Invalid email format.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    /// Unknown response style.
    #[error("response_style must be 'concise' or 'detailed', got '{0}'")]
    InvalidResponseStyle(String),
    /// Numeric value outside the accepted range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: String, value: f64 },
    /// Value too long.
    #[error("{field} is too long ({actual} chars, max {max})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },
    /// Empty value where one is required.
    #[error("{0} cannot be empty")]
    Empty(String),
}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Maximum allowed length for conversation titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed length for a profile name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Accepted response styles.
pub const RESPONSE_STYLES: [&str; 2] = ["concise", "detailed"];

/// Oldest accepted age in years.
pub const MAX_AGE: i64 = 150;

/// Heaviest accepted weight in kilograms.
pub const MAX_WEIGHT_KG: f64 = 1000.0;

/// Validate an email address (basic format check).
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain an @ symbol".to_string(),
        ));
    };

    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must look like example.com".to_string(),
        ));
    }

    Ok(())
}

/// Validate a response style (`concise` or `detailed`).
pub fn validate_response_style(style: &str) -> Result<(), ValidationError> {
    if RESPONSE_STYLES.contains(&style) {
        Ok(())
    } else {
        Err(ValidationError::InvalidResponseStyle(style.to_string()))
    }
}

/// Validate an age in years (0 to 150 inclusive).
pub fn validate_age(age: i64) -> Result<(), ValidationError> {
    if (0..=MAX_AGE).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "age".to_string(),
            value: age as f64,
        })
    }
}

/// Validate a weight in kilograms (greater than 0, at most 1000).
pub fn validate_weight(weight: f64) -> Result<(), ValidationError> {
    if weight.is_finite() && weight > 0.0 && weight <= MAX_WEIGHT_KG {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "weight".to_string(),
            value: weight,
        })
    }
}

/// Validate a profile name length.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let actual = name.chars().count();
    if actual > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
            actual,
        });
    }
    Ok(())
}

/// Normalize a conversation title. Blank becomes `"New chat"`.
pub fn normalize_title(title: Option<&str>) -> Result<String, ValidationError> {
    let title = title.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Ok(crate::conversation::DEFAULT_TITLE.to_string());
    }
    let actual = title.chars().count();
    if actual > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LENGTH,
            actual,
        });
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email(" a@b.c ").is_ok());

        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_email("test.example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("a@b@c.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("@example.com"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            validate_email("test@localhost"),
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_validate_response_style() {
        assert!(validate_response_style("concise").is_ok());
        assert!(validate_response_style("detailed").is_ok());
        assert!(matches!(
            validate_response_style("verbose"),
            Err(ValidationError::InvalidResponseStyle(_))
        ));
    }

    #[test]
    fn test_validate_age_bounds() {
        assert!(validate_age(0).is_ok());
        assert!(validate_age(150).is_ok());
        assert!(validate_age(-1).is_err());
        assert!(validate_age(151).is_err());
    }

    #[test]
    fn test_validate_weight_bounds() {
        assert!(validate_weight(0.5).is_ok());
        assert!(validate_weight(1000.0).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(1000.1).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title(None).unwrap(), "New chat");
        assert_eq!(normalize_title(Some("   ")).unwrap(), "New chat");
        assert_eq!(normalize_title(Some(" Sleep ")).unwrap(), "Sleep");
        assert!(normalize_title(Some(&"x".repeat(201))).is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
            actual: 300,
        };
        assert_eq!(err.to_string(), "title is too long (300 chars, max 200)");
    }
}
