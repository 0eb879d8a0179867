use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{
    Client, ClientDetail, ClientPatch, NewClient, ProjectFilter, ReminderFilter,
};
use crate::database::scoped::{find_owned, not_found};
use crate::database::store::{ClientStore, ProjectStore, ReminderStore};
use crate::database::Store;
use crate::error::ApiError;

pub struct ClientService {
    store: Arc<dyn Store>,
}

impl ClientService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: Uuid, client: NewClient) -> Result<Client, ApiError> {
        let client = self.store.insert_client(owner, client).await?;
        tracing::info!("Created client {} for user {}", client.id, owner);
        Ok(client)
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<Client>, ApiError> {
        Ok(self.store.clients(owner).await?)
    }

    /// The client with its projects and reminders.
    pub async fn show(&self, owner: Uuid, id: Uuid) -> Result<ClientDetail, ApiError> {
        let client = find_owned::<Client>(self.store.as_ref(), owner, id).await?;

        let (projects, reminders) = futures::try_join!(
            self.store.projects(owner, ProjectFilter { client_id: Some(id) }),
            self.store.reminders(
                owner,
                ReminderFilter {
                    client_id: Some(id),
                    ..Default::default()
                }
            ),
        )?;

        Ok(ClientDetail {
            client,
            projects,
            reminders,
        })
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, patch: ClientPatch) -> Result<Client, ApiError> {
        self.store
            .update_client(owner, id, patch)
            .await?
            .ok_or_else(not_found::<Client>)
    }

    /// Removes the client together with its projects and reminders.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !self.store.delete_client(owner, id).await? {
            return Err(not_found::<Client>());
        }
        tracing::info!("Deleted client {} for user {}", id, owner);
        Ok(())
    }
}
