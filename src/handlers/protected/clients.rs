// handlers/protected/clients.rs - /api/clients handlers

use axum::extract::{Extension, Path, State};

use crate::api::JsonBody;
use crate::database::models::client::ClientRequest;
use crate::database::models::{Client, ClientDetail};
use crate::database::scoped::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ClientService;
use crate::state::AppState;

/// POST /api/clients - create a client owned by the caller
pub async fn clients_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<ClientRequest>,
) -> ApiResult<Client> {
    let client = body.validate_new()?;
    let client = ClientService::new(state.store).create(user.id, client).await?;
    Ok(ApiResponse::created(client))
}

/// GET /api/clients - caller's clients, newest first
pub async fn clients_get(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Client>> {
    let clients = ClientService::new(state.store).list(user.id).await?;
    Ok(ApiResponse::success(clients))
}

/// GET /api/clients/:id - client with its projects and reminders
pub async fn client_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ClientDetail> {
    let id = parse_id::<Client>(&id)?;
    let detail = ClientService::new(state.store).show(user.id, id).await?;
    Ok(ApiResponse::success(detail))
}

/// PATCH /api/clients/:id - partial update
pub async fn client_patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ClientRequest>,
) -> ApiResult<Client> {
    let id = parse_id::<Client>(&id)?;
    let patch = body.validate_patch()?;
    let client = ClientService::new(state.store).update(user.id, id, patch).await?;
    Ok(ApiResponse::success(client))
}

/// DELETE /api/clients/:id - also removes the client's projects and reminders
pub async fn client_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id::<Client>(&id)?;
    ClientService::new(state.store).delete(user.id, id).await?;
    Ok(ApiResponse::no_content())
}
