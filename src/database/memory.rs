use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    Client, ClientPatch, NewClient, NewProject, NewReminder, NewUser, Project, ProjectFilter, ProjectPatch,
    ProjectStatus, Reminder, ReminderFilter, ReminderPatch, User,
};
use super::store::{ClientStore, ProjectStore, ReminderStore, Store, StoreError, StoreResult, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    clients: Vec<Client>,
    projects: Vec<Project>,
    reminders: Vec<Reminder>,
}

/// Process-local store with the same ordering, scoping and cascade rules as
/// the Postgres schema. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already registered".to_string()));
        }

        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn insert_client(&self, owner: Uuid, client: NewClient) -> StoreResult<Client> {
        let row = Client {
            id: Uuid::new_v4(),
            name: client.name,
            email: client.email,
            phone: client.phone,
            company: client.company,
            notes: client.notes,
            user_id: owner,
            created_at: Utc::now(),
        };
        self.tables.write().await.clients.push(row.clone());
        Ok(row)
    }

    async fn clients(&self, owner: Uuid) -> StoreResult<Vec<Client>> {
        let tables = self.tables.read().await;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut rows: Vec<Client> = tables
            .clients
            .iter()
            .rev()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|c| Reverse(c.created_at));
        Ok(rows)
    }

    async fn client(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Client>> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
            .cloned())
    }

    async fn clients_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Client>> {
        let tables = self.tables.read().await;
        Ok(tables
            .clients
            .iter()
            .filter(|c| c.user_id == owner && ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn update_client(&self, owner: Uuid, id: Uuid, patch: ClientPatch) -> StoreResult<Option<Client>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .clients
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
            .map(|client| {
                patch.apply(client);
                client.clone()
            }))
    }

    async fn delete_client(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.clients.len();
        tables.clients.retain(|c| !(c.id == id && c.user_id == owner));
        if tables.clients.len() == before {
            return Ok(false);
        }

        let removed_projects: HashSet<Uuid> = tables
            .projects
            .iter()
            .filter(|p| p.client_id == id)
            .map(|p| p.id)
            .collect();
        tables.projects.retain(|p| p.client_id != id);
        tables.reminders.retain(|r| {
            r.client_id != Some(id) && !r.project_id.is_some_and(|p| removed_projects.contains(&p))
        });
        Ok(true)
    }

    async fn count_clients(&self, owner: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.clients.iter().filter(|c| c.user_id == owner).count() as i64)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, owner: Uuid, project: NewProject) -> StoreResult<Project> {
        let row = Project {
            id: Uuid::new_v4(),
            title: project.title,
            budget: project.budget,
            deadline: project.deadline,
            status: project.status,
            client_id: project.client_id,
            user_id: owner,
            created_at: Utc::now(),
        };
        self.tables.write().await.projects.push(row.clone());
        Ok(row)
    }

    async fn projects(&self, owner: Uuid, filter: ProjectFilter) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| p.user_id == owner)
            .filter(|p| filter.client_id.map_or(true, |id| p.client_id == id))
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.deadline);
        Ok(rows)
    }

    async fn project(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == owner)
            .cloned())
    }

    async fn projects_by_ids(&self, owner: Uuid, ids: &[Uuid]) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.user_id == owner && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_project(&self, owner: Uuid, id: Uuid, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
            .map(|project| {
                patch.apply(project);
                project.clone()
            }))
    }

    async fn delete_project(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| !(p.id == id && p.user_id == owner));
        if tables.projects.len() == before {
            return Ok(false);
        }

        tables.reminders.retain(|r| r.project_id != Some(id));
        Ok(true)
    }

    async fn count_projects(&self, owner: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().filter(|p| p.user_id == owner).count() as i64)
    }

    async fn project_status_counts(&self, owner: Uuid) -> StoreResult<Vec<(ProjectStatus, i64)>> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<ProjectStatus, i64> = BTreeMap::new();
        for project in tables.projects.iter().filter(|p| p.user_id == owner) {
            *counts.entry(project.status).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl ReminderStore for MemoryStore {
    async fn insert_reminder(&self, owner: Uuid, reminder: NewReminder) -> StoreResult<Reminder> {
        let row = Reminder {
            id: Uuid::new_v4(),
            title: reminder.title,
            description: reminder.description,
            due_date: reminder.due_date,
            completed: false,
            client_id: reminder.client_id,
            project_id: reminder.project_id,
            user_id: owner,
            created_at: Utc::now(),
        };
        self.tables.write().await.reminders.push(row.clone());
        Ok(row)
    }

    async fn reminders(&self, owner: Uuid, filter: ReminderFilter) -> StoreResult<Vec<Reminder>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Reminder> = tables
            .reminders
            .iter()
            .filter(|r| r.user_id == owner && filter.matches(r))
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.due_date);
        Ok(rows)
    }

    async fn reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Reminder>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reminders
            .iter()
            .find(|r| r.id == id && r.user_id == owner)
            .cloned())
    }

    async fn update_reminder(&self, owner: Uuid, id: Uuid, patch: ReminderPatch) -> StoreResult<Option<Reminder>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .reminders
            .iter_mut()
            .find(|r| r.id == id && r.user_id == owner)
            .map(|reminder| {
                patch.apply(reminder);
                reminder.clone()
            }))
    }

    async fn delete_reminder(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.reminders.len();
        tables.reminders.retain(|r| !(r.id == id && r.user_id == owner));
        Ok(tables.reminders.len() != before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("Closed in-memory store");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555".to_string(),
            company: None,
            notes: None,
        }
    }

    fn new_project(client_id: Uuid, days: i64, status: ProjectStatus) -> NewProject {
        NewProject {
            title: "Site".to_string(),
            budget: 100.0,
            deadline: Utc::now() + Duration::days(days),
            status,
            client_id,
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let user = NewUser {
            email: "a@x.com".into(),
            password_hash: "h".into(),
            name: "A".into(),
        };
        store.insert_user(user.clone()).await.unwrap();
        let err = store.insert_user(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn lookups_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let client = store.insert_client(alice, new_client("Acme")).await.unwrap();

        assert!(store.client(alice, client.id).await.unwrap().is_some());
        assert!(store.client(bob, client.id).await.unwrap().is_none());
        assert!(store
            .update_client(bob, client.id, ClientPatch { name: Some("Evil".into()), ..Default::default() })
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_client(bob, client.id).await.unwrap());
        assert_eq!(store.client(alice, client.id).await.unwrap().unwrap().name, "Acme");
        assert_eq!(store.count_clients(bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clients_list_newest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let first = store.insert_client(owner, new_client("First")).await.unwrap();
        let second = store.insert_client(owner, new_client("Second")).await.unwrap();

        let ids: Vec<Uuid> = store.clients(owner).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn deleting_client_cascades() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let client = store.insert_client(owner, new_client("Acme")).await.unwrap();
        let other = store.insert_client(owner, new_client("Other")).await.unwrap();
        let project = store
            .insert_project(owner, new_project(client.id, 3, ProjectStatus::Planned))
            .await
            .unwrap();
        store
            .insert_reminder(
                owner,
                NewReminder {
                    title: "Follow up".into(),
                    description: None,
                    due_date: Utc::now(),
                    client_id: None,
                    project_id: Some(project.id),
                },
            )
            .await
            .unwrap();
        store
            .insert_reminder(
                owner,
                NewReminder {
                    title: "Unrelated".into(),
                    description: None,
                    due_date: Utc::now(),
                    client_id: Some(other.id),
                    project_id: None,
                },
            )
            .await
            .unwrap();

        assert!(store.delete_client(owner, client.id).await.unwrap());
        assert_eq!(store.count_projects(owner).await.unwrap(), 0);
        let remaining = store.reminders(owner, ReminderFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Unrelated");
    }

    #[tokio::test]
    async fn status_counts_omit_empty_statuses() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let client = store.insert_client(owner, new_client("Acme")).await.unwrap();
        for status in [ProjectStatus::Planned, ProjectStatus::Planned, ProjectStatus::OnHold] {
            store.insert_project(owner, new_project(client.id, 1, status)).await.unwrap();
        }

        let counts = store.project_status_counts(owner).await.unwrap();
        assert_eq!(counts, vec![(ProjectStatus::Planned, 2), (ProjectStatus::OnHold, 1)]);
    }

    #[tokio::test]
    async fn projects_sorted_by_deadline() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let client = store.insert_client(owner, new_client("Acme")).await.unwrap();
        let late = store
            .insert_project(owner, new_project(client.id, 30, ProjectStatus::Planned))
            .await
            .unwrap();
        let soon = store
            .insert_project(owner, new_project(client.id, 2, ProjectStatus::Planned))
            .await
            .unwrap();

        let ids: Vec<Uuid> = store
            .projects(owner, ProjectFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![soon.id, late.id]);
    }
}
