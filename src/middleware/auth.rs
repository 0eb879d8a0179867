use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::store::UserStore;
use crate::error::ApiError;
use crate::state::AppState;

/// The only message clients see for any authentication failure.
pub const UNAUTHENTICATED: &str = "Please authenticate";

/// Authenticated caller identity attached to the request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
        }
    }
}

/// JWT authentication middleware: validates the bearer token, confirms the
/// account still exists, then injects [`AuthUser`] for downstream handlers.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(|msg| {
        tracing::debug!("Authentication failed: {}", msg);
        ApiError::unauthorized(UNAUTHENTICATED)
    })?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Authentication failed: {}", e);
        ApiError::unauthorized(UNAUTHENTICATED)
    })?;

    // A still-valid token may outlive its account
    let user = state.store.user_by_email(&claims.email).await?;
    let Some(user) = user else {
        tracing::warn!("Authentication failed: no account for token subject {}", claims.id);
        return Err(ApiError::unauthorized(UNAUTHENTICATED));
    };

    request.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty JWT token");
    }

    Ok(token)
}
