use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{
    Client, ClientPatch, NewClient, NewProject, NewReminder, NewUser, Project, ProjectFilter, ProjectPatch,
    ProjectStatus, Reminder, ReminderFilter, ReminderPatch, User,
};

/// Errors surfaced by any store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Every method is scoped by `owner`; rows of other users behave as absent.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn insert_client(&self, owner: Uuid, client: NewClient) -> StoreResult<Client>;

    /// Newest first.
    async fn clients(&self, owner: Uuid) -> StoreResult<Vec<Client>>;

    async fn client(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Client>>;

    async fn clients_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Client>>;

    async fn update_client(&self, owner: Uuid, id: Uuid, patch: ClientPatch) -> StoreResult<Option<Client>>;

    /// Returns whether a row was removed. Dependent projects and reminders go with it.
    async fn delete_client(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;

    async fn count_clients(&self, owner: Uuid) -> StoreResult<i64>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, owner: Uuid, project: NewProject) -> StoreResult<Project>;

    /// Deadline ascending.
    async fn projects(&self, owner: Uuid, filter: ProjectFilter) -> StoreResult<Vec<Project>>;

    async fn project(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>>;

    async fn projects_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Project>>;

    async fn update_project(&self, owner: Uuid, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>>;

    /// Returns whether a row was removed. Dependent reminders go with it.
    async fn delete_project(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;

    async fn count_projects(&self, owner: Uuid) -> StoreResult<i64>;

    /// Only statuses with at least one project appear.
    async fn project_status_counts(&self, owner: Uuid) -> StoreResult<Vec<(ProjectStatus, i64)>>;
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn insert_reminder(&self, owner: Uuid, reminder: NewReminder) -> StoreResult<Reminder>;

    /// Due date ascending.
    async fn reminders(&self, owner: Uuid, filter: ReminderFilter) -> StoreResult<Vec<Reminder>>;

    async fn reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Reminder>>;

    async fn update_reminder(&self, owner: Uuid, id: Uuid, patch: ReminderPatch) -> StoreResult<Option<Reminder>>;

    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

/// Handle to the relational store, created once by the entry point and shared
/// with every request through `AppState`.
#[async_trait]
pub trait Store: UserStore + ClientStore + ProjectStore + ReminderStore {
    /// Round-trips to the backend for health checks.
    async fn ping(&self) -> StoreResult<()>;

    /// Releases connections; called once after the server has drained.
    async fn close(&self);
}
