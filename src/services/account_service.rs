use std::sync::Arc;

use serde::Serialize;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::TokenKeys;
use crate::database::models::user::{LoginInput, SignupInput};
use crate::database::models::{NewUser, User, UserProfile};
use crate::database::store::UserStore;
use crate::database::Store;
use crate::error::ApiError;
use crate::state::AppState;

/// Unknown email and wrong password must be indistinguishable to the caller.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const EMAIL_TAKEN: &str = "Email already registered";

/// Signup and login response body.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: UserProfile,
    pub token: String,
}

/// Account registration and credential exchange
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: Arc<TokenKeys>,
}

impl AccountService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            tokens: state.tokens.clone(),
        }
    }

    pub async fn signup(&self, input: SignupInput) -> Result<Session, ApiError> {
        if self.store.user_by_email(&input.email).await?.is_some() {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password_blocking(input.password).await?;

        // The unique index still decides a concurrent signup for the same email
        let user = self
            .store
            .insert_user(NewUser {
                email: input.email,
                password_hash,
                name: input.name,
            })
            .await
            .map_err(|e| match ApiError::from(e) {
                ApiError::Conflict(_) => ApiError::conflict(EMAIL_TAKEN),
                other => other,
            })?;

        tracing::info!("Registered user {}", user.id);
        self.session_for(&user)
    }

    pub async fn login(&self, input: LoginInput) -> Result<Session, ApiError> {
        let Some(user) = self.store.user_by_email(&input.email).await? else {
            tracing::debug!("Login rejected: unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
            tracing::debug!("Login rejected: password mismatch for user {}", user.id);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }

        self.session_for(&user)
    }

    fn session_for(&self, user: &User) -> Result<Session, ApiError> {
        Ok(Session {
            user: user.profile(),
            token: self.tokens.issue(user.id, &user.email)?,
        })
    }
}
