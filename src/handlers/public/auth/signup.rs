// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::extract::State;

use crate::api::JsonBody;
use crate::database::models::user::SignupRequest;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountService, Session};
use crate::state::AppState;

/// POST /api/auth/signup - Register a new account
///
/// Expected input: `{ "email": "string", "password": "string", "name": "string" }`
///
/// 201 with the new user and a session token; 409 when the email is taken.
pub async fn signup_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignupRequest>,
) -> ApiResult<Session> {
    let input = body.validate()?;
    let session = AccountService::new(&state).signup(input).await?;
    Ok(ApiResponse::created(session))
}
