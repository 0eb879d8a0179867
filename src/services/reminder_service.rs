use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::database::models::{
    Client, ClientSummary, NewReminder, Project, ProjectSummary, Reminder, ReminderDetail, ReminderFilter,
    ReminderPatch, ReminderWithRefs,
};
use crate::database::scoped::{find_owned, not_found};
use crate::database::store::{ClientStore, ProjectStore, ReminderStore};
use crate::database::Store;
use crate::error::ApiError;

/// Length of the "due soon" window used by `/api/reminders/due` and the dashboard.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Incomplete reminders due in `[now, now + 7 days]`.
pub fn upcoming_window(now: DateTime<Utc>) -> ReminderFilter {
    ReminderFilter {
        completed: Some(false),
        due_from: Some(now),
        due_until: Some(now + Duration::days(UPCOMING_WINDOW_DAYS)),
        ..Default::default()
    }
}

pub struct ReminderService {
    store: Arc<dyn Store>,
}

impl ReminderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: Uuid, reminder: NewReminder) -> Result<ReminderWithRefs, ApiError> {
        self.check_references(owner, reminder.client_id, reminder.project_id)
            .await?;

        let reminder = self.store.insert_reminder(owner, reminder).await?;
        tracing::info!("Created reminder {} for user {}", reminder.id, owner);
        self.with_ref(owner, reminder).await
    }

    /// Due date ascending.
    pub async fn list(&self, owner: Uuid, filter: ReminderFilter) -> Result<Vec<ReminderWithRefs>, ApiError> {
        let reminders = self.store.reminders(owner, filter).await?;
        self.with_refs(owner, reminders).await
    }

    pub async fn due(&self, owner: Uuid, now: DateTime<Utc>) -> Result<Vec<ReminderWithRefs>, ApiError> {
        self.list(owner, upcoming_window(now)).await
    }

    pub async fn show(&self, owner: Uuid, id: Uuid) -> Result<ReminderDetail, ApiError> {
        let reminder = find_owned::<Reminder>(self.store.as_ref(), owner, id).await?;

        let client = match reminder.client_id {
            Some(client_id) => self.store.client(owner, client_id).await?,
            None => None,
        };
        let project = match reminder.project_id {
            Some(project_id) => self.store.project(owner, project_id).await?,
            None => None,
        };

        Ok(ReminderDetail {
            reminder,
            client,
            project,
        })
    }

    /// References are checked against the reminder as it will look after the
    /// patch, so a new project must still agree with the kept client.
    pub async fn update(&self, owner: Uuid, id: Uuid, patch: ReminderPatch) -> Result<ReminderWithRefs, ApiError> {
        let existing = find_owned::<Reminder>(self.store.as_ref(), owner, id).await?;

        if patch.client_id.is_some() || patch.project_id.is_some() {
            self.check_references(
                owner,
                patch.client_id.or(existing.client_id),
                patch.project_id.or(existing.project_id),
            )
            .await?;
        }

        let reminder = self
            .store
            .update_reminder(owner, id, patch)
            .await?
            .ok_or_else(not_found::<Reminder>)?;
        self.with_ref(owner, reminder).await
    }

    /// Read-then-write: two concurrent toggles may land as zero or two flips.
    pub async fn toggle(&self, owner: Uuid, id: Uuid) -> Result<ReminderWithRefs, ApiError> {
        let existing = find_owned::<Reminder>(self.store.as_ref(), owner, id).await?;

        let patch = ReminderPatch {
            completed: Some(!existing.completed),
            ..Default::default()
        };
        let reminder = self
            .store
            .update_reminder(owner, id, patch)
            .await?
            .ok_or_else(not_found::<Reminder>)?;

        tracing::debug!("Reminder {} completed={}", reminder.id, reminder.completed);
        self.with_ref(owner, reminder).await
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ApiError> {
        if !self.store.delete_reminder(owner, id).await? {
            return Err(not_found::<Reminder>());
        }
        tracing::info!("Deleted reminder {} for user {}", id, owner);
        Ok(())
    }

    /// Every reference must be owned by `owner`; a project given together
    /// with a client must belong to that client.
    async fn check_references(
        &self,
        owner: Uuid,
        client_id: Option<Uuid>,
        project_id: Option<Uuid>,
    ) -> Result<(), ApiError> {
        if let Some(client_id) = client_id {
            find_owned::<Client>(self.store.as_ref(), owner, client_id).await?;
        }

        if let Some(project_id) = project_id {
            let project = find_owned::<Project>(self.store.as_ref(), owner, project_id).await?;
            if client_id.is_some_and(|client_id| project.client_id != client_id) {
                return Err(not_found::<Project>());
            }
        }

        Ok(())
    }

    async fn with_ref(&self, owner: Uuid, reminder: Reminder) -> Result<ReminderWithRefs, ApiError> {
        let mut annotated = self.with_refs(owner, vec![reminder]).await?;
        annotated.pop().ok_or_else(not_found::<Reminder>)
    }

    /// Attach client and project summaries with one batched lookup per kind.
    pub async fn with_refs(&self, owner: Uuid, reminders: Vec<Reminder>) -> Result<Vec<ReminderWithRefs>, ApiError> {
        let client_ids = unique(reminders.iter().filter_map(|r| r.client_id));
        let project_ids = unique(reminders.iter().filter_map(|r| r.project_id));

        let (clients, projects) = futures::try_join!(
            self.store.clients_by_ids(owner, &client_ids),
            self.store.projects_by_ids(owner, &project_ids),
        )?;

        let clients: HashMap<Uuid, ClientSummary> =
            clients.iter().map(|c| (c.id, ClientSummary::from(c))).collect();
        let projects: HashMap<Uuid, ProjectSummary> =
            projects.iter().map(|p| (p.id, ProjectSummary::from(p))).collect();

        Ok(reminders
            .into_iter()
            .map(|reminder| ReminderWithRefs {
                client: reminder.client_id.and_then(|id| clients.get(&id).cloned()),
                project: reminder.project_id.and_then(|id| projects.get(&id).cloned()),
                reminder,
            })
            .collect())
    }
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
