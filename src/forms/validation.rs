//! Field-level validators applied before any persistence attempt.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]{10,}$").expect("phone pattern"));

/// Reasons a submission is rejected. The display text is what callers see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields(Vec<&'static str>),

    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Invalid form data. Please check your inputs.")]
    InvalidInput { field: &'static str, reason: String },
}

impl ValidationError {
    /// The offending field names, for logging.
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::MissingFields(fields) => fields.clone(),
            ValidationError::EmailRequired | ValidationError::InvalidEmail => vec!["email"],
            ValidationError::InvalidPhone => vec!["phone"],
            ValidationError::InvalidInput { field, .. } => vec![*field],
        }
    }

    /// Why an input was judged invalid, for logs. Callers only ever see
    /// the display text.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidInput { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Every listed field must be present and non-empty. Reports all missing
/// fields at once.
pub fn require(fields: &[(&'static str, &Option<String>)]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

pub fn check_email(value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn check_phone(value: &str) -> Result<(), ValidationError> {
    if is_valid_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone)
    }
}

pub fn check_min_len(field: &'static str, value: &str, min: usize) -> Result<(), ValidationError> {
    if value.chars().count() >= min {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput {
            field,
            reason: format!("must be at least {} characters long", min),
        })
    }
}

/// Case-sensitive membership check against a fixed set. No defaulting.
pub fn check_one_of(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidInput {
            field,
            reason: format!("'{}' is not one of {}", value, allowed.join(", ")),
        })
    }
}
