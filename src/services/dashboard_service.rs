use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::reminder_service::{upcoming_window, ReminderService};
use crate::database::models::{ProjectStatus, ReminderWithRefs};
use crate::database::store::{ClientStore, ProjectStore, ReminderStore};
use crate::database::Store;
use crate::error::ApiError;

/// GET /api/dashboard payload. Statuses without projects are absent from
/// `projects_by_status` rather than zero.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clients: i64,
    pub total_projects: i64,
    pub upcoming_reminders: Vec<ReminderWithRefs>,
    pub projects_by_status: BTreeMap<ProjectStatus, i64>,
}

pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, owner: Uuid, now: DateTime<Utc>) -> Result<DashboardStats, ApiError> {
        let (total_clients, total_projects, upcoming, by_status) = futures::try_join!(
            self.store.count_clients(owner),
            self.store.count_projects(owner),
            self.store.reminders(owner, upcoming_window(now)),
            self.store.project_status_counts(owner),
        )?;

        let upcoming_reminders = ReminderService::new(self.store.clone())
            .with_refs(owner, upcoming)
            .await?;

        Ok(DashboardStats {
            total_clients,
            total_projects,
            upcoming_reminders,
            projects_by_status: by_status.into_iter().filter(|(_, count)| *count > 0).collect(),
        })
    }
}
