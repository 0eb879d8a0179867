// Ownership-scoped lookups
//
// The only by-id read path services use. A record that exists but belongs to
// another user resolves exactly like a missing one.

use async_trait::async_trait;
use uuid::Uuid;

use super::models::{Client, Project, Reminder};
use super::store::{ClientStore, ProjectStore, ReminderStore, Store, StoreResult};
use crate::error::ApiError;
use crate::types::Resource;

#[async_trait]
pub trait Scoped: Sized + Send {
    const RESOURCE: Resource;

    async fn lookup(store: &dyn Store, owner: Uuid, id: Uuid) -> StoreResult<Option<Self>>;
}

#[async_trait]
impl Scoped for Client {
    const RESOURCE: Resource = Resource::Client;

    async fn lookup(store: &dyn Store, owner: Uuid, id: Uuid) -> StoreResult<Option<Self>> {
        store.client(owner, id).await
    }
}

#[async_trait]
impl Scoped for Project {
    const RESOURCE: Resource = Resource::Project;

    async fn lookup(store: &dyn Store, owner: Uuid, id: Uuid) -> StoreResult<Option<Self>> {
        store.project(owner, id).await
    }
}

#[async_trait]
impl Scoped for Reminder {
    const RESOURCE: Resource = Resource::Reminder;

    async fn lookup(store: &dyn Store, owner: Uuid, id: Uuid) -> StoreResult<Option<Self>> {
        store.reminder(owner, id).await
    }
}

/// Fetch `id` of kind `T` owned by `owner`, else `NotFound`.
pub async fn find_owned<T: Scoped>(store: &dyn Store, owner: Uuid, id: Uuid) -> Result<T, ApiError> {
    T::lookup(store, owner, id)
        .await?
        .ok_or_else(|| not_found::<T>())
}

/// Resolve a raw path segment; ids that are not UUIDs cannot name anything.
pub fn parse_id<T: Scoped>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found::<T>())
}

pub fn not_found<T: Scoped>() -> ApiError {
    ApiError::not_found(T::RESOURCE.not_found_message())
}
