pub mod password;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// Session token payload. Carries identity only; no revocation list exists,
/// so a token stays valid until `exp` even after a password change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT generation error: {0}")]
    Generation(jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Invalid(jsonwebtoken::errors::Error),

    #[error("JWT expiry of {0} seconds is out of range")]
    ExpiryOutOfRange(u64),
}

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_secs: u64,
    expiry: Option<TimeDelta>,
}

impl TokenKeys {
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_secs,
            expiry: i64::try_from(expiry_secs).ok().and_then(TimeDelta::try_seconds),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiry_secs)
    }

    /// Fails when `now + expiry` falls outside the representable date range.
    pub fn claims_for(&self, id: Uuid, email: &str) -> Result<Claims, TokenError> {
        let now = Utc::now();
        let exp = self
            .expiry
            .and_then(|expiry| now.checked_add_signed(expiry))
            .ok_or(TokenError::ExpiryOutOfRange(self.expiry_secs))?;
        Ok(Claims {
            id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn issue(&self, id: Uuid, email: &str) -> Result<String, TokenError> {
        self.sign(&self.claims_for(id, email)?)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding).map_err(TokenError::Generation)
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_identity() {
        let keys = TokenKeys::new("secret", 3600);
        let id = Uuid::new_v4();
        let token = keys.issue(id, "a@x.com").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.id, id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("secret", 3600);
        let now = Utc::now().timestamp();
        let token = keys
            .sign(&Claims {
                id: Uuid::new_v4(),
                email: "a@x.com".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();
        assert!(matches!(keys.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenKeys::new("other", 3600).issue(Uuid::new_v4(), "a@x.com").unwrap();
        assert!(TokenKeys::new("secret", 3600).verify(&token).is_err());
        assert!(TokenKeys::new("secret", 3600).verify("not.a.jwt").is_err());
    }

    #[test]
    fn oversized_expiry_fails_instead_of_overflowing() {
        for secs in [9_000_000_000_000_000, 100_000_000_000_000_000, u64::MAX] {
            let keys = TokenKeys::new("secret", secs);
            assert!(matches!(
                keys.issue(Uuid::new_v4(), "a@x.com"),
                Err(TokenError::ExpiryOutOfRange(s)) if s == secs
            ));
        }
    }
}
