// Payload field validation shared by every request body
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// The first failing field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{message}")]
    Required {
        field: &'static str,
        message: &'static str,
    },

    #[error("{message}")]
    Invalid {
        field: &'static str,
        message: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Required { field, .. } | FieldError::Invalid { field, .. } => field,
        }
    }
}

/// A non-blank string that must be present.
pub fn required_text(
    field: &'static str,
    value: Option<String>,
    message: &'static str,
) -> Result<String, FieldError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FieldError::Required { field, message }),
    }
}

/// Same rule as [`required_text`] but only applied when the field is present.
pub fn patch_text(
    field: &'static str,
    value: Option<String>,
    message: &'static str,
) -> Result<Option<String>, FieldError> {
    value
        .map(|v| required_text(field, Some(v), message))
        .transpose()
}

pub fn email(field: &'static str, value: &str, message: &'static str) -> Result<String, FieldError> {
    if is_valid_email(value) {
        Ok(value.to_string())
    } else {
        Err(FieldError::Invalid { field, message })
    }
}

pub fn uuid(field: &'static str, value: &str, message: &'static str) -> Result<Uuid, FieldError> {
    Uuid::parse_str(value.trim()).map_err(|_| FieldError::Invalid { field, message })
}

/// Parses an RFC 3339 timestamp, normalised to UTC.
pub fn timestamp(
    field: &'static str,
    value: &str,
    message: &'static str,
) -> Result<DateTime<Utc>, FieldError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| FieldError::Invalid { field, message })
}

pub fn non_negative(field: &'static str, value: f64, message: &'static str) -> Result<f64, FieldError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FieldError::Invalid { field, message })
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
