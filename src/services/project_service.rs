use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::{
    Client, ClientSummary, NewProject, Project, ProjectDetail, ProjectFilter, ProjectPatch, ProjectWithClient,
    ReminderFilter,
};
use crate::database::scoped::{find_owned, not_found};
use crate::database::store::{ClientStore, ProjectStore, ReminderStore};
use crate::database::Store;
use crate::error::ApiError;

pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The referenced client must belong to `owner`.
    pub async fn create(&self, owner: Uuid, project: NewProject) -> Result<ProjectWithClient, ApiError> {
        let client = find_owned::<Client>(self.store.as_ref(), owner, project.client_id).await?;
        let project = self.store.insert_project(owner, project).await?;
        tracing::info!("Created project {} for user {}", project.id, owner);

        Ok(ProjectWithClient {
            project,
            client: Some(ClientSummary::from(&client)),
        })
    }

    pub async fn list(&self, owner: Uuid) -> Result<Vec<ProjectWithClient>, ApiError> {
        let projects = self.store.projects(owner, ProjectFilter::default()).await?;
        self.with_clients(owner, projects).await
    }

    /// Empty when the client does not exist or belongs to someone else.
    pub async fn list_for_client(&self, owner: Uuid, client_id: Uuid) -> Result<Vec<ProjectWithClient>, ApiError> {
        let projects = self
            .store
            .projects(owner, ProjectFilter { client_id: Some(client_id) })
            .await?;
        self.with_clients(owner, projects).await
    }

    pub async fn show(&self, owner: Uuid, id: Uuid) -> Result<ProjectDetail, ApiError> {
        let project = find_owned::<Project>(self.store.as_ref(), owner, id).await?;

        let (client, reminders) = futures::try_join!(
            self.store.client(owner, project.client_id),
            self.store.reminders(
                owner,
                ReminderFilter {
                    project_id: Some(id),
                    ..Default::default()
                }
            ),
        )?;

        Ok(ProjectDetail {
            project,
            client,
            reminders,
        })
    }

    /// A new `client_id` must name one of the caller's clients.
    pub async fn update(&self, owner: Uuid, id: Uuid, patch: ProjectPatch) -> Result<ProjectWithClient, ApiError> {
        find_owned::<Project>(self.store.as_ref(), owner, id).await?;
        if let Some(client_id) = patch.client_id {
            find_owned::<Client>(self.store.as_ref(), owner, client_id).await?;
        }

        let project = self
            .store
            .update_project(owner, id, patch)
            .await?
            .ok_or_else(not_found::<Project>)?;
        let client = self.store.client(owner, project.client_id).await?;

        Ok(ProjectWithClient {
            project,
            client: client.as_ref().map(ClientSummary::from),
        })
    }

    /// Removes the project and its reminders.
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !self.store.delete_project(owner, id).await? {
            return Err(not_found::<Project>());
        }
        tracing::info!("Deleted project {} for user {}", id, owner);
        Ok(())
    }

    async fn with_clients(&self, owner: Uuid, projects: Vec<Project>) -> Result<Vec<ProjectWithClient>, ApiError> {
        let mut ids: Vec<Uuid> = projects.iter().map(|p| p.client_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let clients: HashMap<Uuid, ClientSummary> = self
            .store
            .clients_by_ids(owner, &ids)
            .await?
            .iter()
            .map(|c| (c.id, ClientSummary::from(c)))
            .collect();

        Ok(projects
            .into_iter()
            .map(|project| ProjectWithClient {
                client: clients.get(&project.client_id).cloned(),
                project,
            })
            .collect())
    }
}
