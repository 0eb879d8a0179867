// handlers/protected/projects.rs - /api/projects handlers

use axum::extract::{Extension, Path, State};

use crate::api::JsonBody;
use crate::database::models::project::ProjectRequest;
use crate::database::models::{Project, ProjectDetail, ProjectWithClient};
use crate::database::scoped::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProjectService;
use crate::state::AppState;

/// POST /api/projects - `clientId` must name one of the caller's clients
pub async fn projects_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<ProjectRequest>,
) -> ApiResult<ProjectWithClient> {
    let project = body.validate_new()?;
    let project = ProjectService::new(state.store).create(user.id, project).await?;
    Ok(ApiResponse::created(project))
}

/// GET /api/projects - deadline ascending, each with its client summary
pub async fn projects_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ProjectWithClient>> {
    let projects = ProjectService::new(state.store).list(user.id).await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/projects/client/:client_id
pub async fn projects_by_client_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(client_id): Path<String>,
) -> ApiResult<Vec<ProjectWithClient>> {
    // An id that cannot name a client matches nothing
    let Ok(client_id) = uuid::Uuid::parse_str(&client_id) else {
        return Ok(ApiResponse::success(Vec::new()));
    };
    let projects = ProjectService::new(state.store)
        .list_for_client(user.id, client_id)
        .await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/projects/:id - project with its client and reminders
pub async fn project_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ProjectDetail> {
    let id = parse_id::<Project>(&id)?;
    let detail = ProjectService::new(state.store).show(user.id, id).await?;
    Ok(ApiResponse::success(detail))
}

/// PATCH /api/projects/:id - partial update
pub async fn project_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ProjectRequest>,
) -> ApiResult<ProjectWithClient> {
    let id = parse_id::<Project>(&id)?;
    let patch = body.validate_patch()?;
    let project = ProjectService::new(state.store).update(user.id, id, patch).await?;
    Ok(ApiResponse::success(project))
}

/// DELETE /api/projects/:id
pub async fn project_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id::<Project>(&id)?;
    ProjectService::new(state.store).delete(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
