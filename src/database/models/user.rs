use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{self, FieldError};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Stored account. Deliberately not `Serialize`: the hash must never reach a response.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public view of a user returned by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<SignupInput, FieldError> {
        let email = validation::required_text("email", self.email, "Email is required")?;
        let email = validation::email("email", &email, "Invalid email address")?;

        let password = self.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FieldError::Invalid {
                field: "password",
                message: "Password must be at least 6 characters",
            });
        }

        let name = validation::required_text("name", self.name, "Name is required")?;

        Ok(SignupInput { email, password, name })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<LoginInput, FieldError> {
        let email = validation::required_text("email", self.email, "Email is required")?;
        let email = validation::email("email", &email, "Invalid email address")?;

        let password = match self.password {
            Some(p) if !p.is_empty() => p,
            _ => {
                return Err(FieldError::Required {
                    field: "password",
                    message: "Password is required",
                })
            }
        };

        Ok(LoginInput { email, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_reports_first_failing_field() {
        let err = SignupRequest {
            email: Some("not-an-email".into()),
            password: Some("x".into()),
            name: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "email");

        let err = SignupRequest {
            email: Some("a@x.com".into()),
            password: Some("short".into()),
            name: Some("A".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = SignupRequest {
            email: Some("a@x.com".into()),
            password: Some("secret1".into()),
            name: Some(" ".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn login_requires_password() {
        let err = LoginRequest {
            email: Some("a@x.com".into()),
            password: Some(String::new()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field(), "password");
    }

    #[test]
    fn profile_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$hash".into(),
            name: "A".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("createdAt").is_some());
    }
}
