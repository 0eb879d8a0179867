// handlers/protected/reminders.rs - /api/reminders handlers

use axum::extract::{Extension, Path, State};
use chrono::Utc;

use crate::api::{JsonBody, QueryParams};
use crate::database::models::reminder::{ReminderQuery, ReminderRequest};
use crate::database::models::{Reminder, ReminderDetail, ReminderWithRefs};
use crate::database::scoped::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ReminderService;
use crate::state::AppState;

/// POST /api/reminders
pub async fn reminders_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<ReminderRequest>,
) -> ApiResult<ReminderWithRefs> {
    let reminder = body.validate_new()?;
    let reminder = ReminderService::new(state.store).create(user.id, reminder).await?;
    Ok(ApiResponse::created(reminder))
}

/// GET /api/reminders?clientId=&projectId=&completed= - due date ascending
pub async fn reminders_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    QueryParams(query): QueryParams<ReminderQuery>,
) -> ApiResult<Vec<ReminderWithRefs>> {
    let filter = query.into_filter()?;
    let reminders = ReminderService::new(state.store).list(user.id, filter).await?;
    Ok(ApiResponse::success(reminders))
}

/// GET /api/reminders/due - incomplete reminders due within the next 7 days
pub async fn reminders_due_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ReminderWithRefs>> {
    let reminders = ReminderService::new(state.store).due(user.id, Utc::now()).await?;
    Ok(ApiResponse::success(reminders))
}

/// GET /api/reminders/:id - reminder with its full client and project
pub async fn reminder_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ReminderDetail> {
    let id = parse_id::<Reminder>(&id)?;
    let detail = ReminderService::new(state.store).show(user.id, id).await?;
    Ok(ApiResponse::success(detail))
}

/// PATCH /api/reminders/:id - partial update, `completed` included
pub async fn reminder_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ReminderRequest>,
) -> ApiResult<ReminderWithRefs> {
    let id = parse_id::<Reminder>(&id)?;
    let patch = body.validate_patch()?;
    let reminder = ReminderService::new(state.store).update(user.id, id, patch).await?;
    Ok(ApiResponse::success(reminder))
}

/// POST /api/reminders/toggle/:id - flip `completed`
pub async fn reminder_toggle_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ReminderWithRefs> {
    let id = parse_id::<Reminder>(&id)?;
    let reminder = ReminderService::new(state.store).toggle(user.id, id).await?;
    Ok(ApiResponse::success(reminder))
}

/// DELETE /api/reminders/:id
pub async fn reminder_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id::<Reminder>(&id)?;
    ReminderService::new(state.store).delete(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
