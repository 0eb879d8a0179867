// handlers/protected/dashboard.rs - GET /api/dashboard handler

use axum::extract::{Extension, State};
use chrono::Utc;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{DashboardService, DashboardStats};
use crate::state::AppState;

/// GET /api/dashboard - counts, upcoming reminders and projects per status
pub async fn dashboard_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<DashboardStats> {
    let stats = DashboardService::new(state.store).stats(user.id, Utc::now()).await?;
    Ok(ApiResponse::success(stats))
}
