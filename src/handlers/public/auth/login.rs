// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;

use crate::api::JsonBody;
use crate::database::models::user::LoginRequest;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AccountService, Session};
use crate::state::AppState;

/// POST /api/auth/login - Exchange email and password for a session token
///
/// Unknown email and wrong password both answer 401 "Invalid credentials".
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Session> {
    let input = body.validate()?;
    let session = AccountService::new(&state).login(input).await?;
    Ok(ApiResponse::success(session))
}
