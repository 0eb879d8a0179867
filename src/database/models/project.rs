use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

use super::{Client, ClientSummary, Reminder};
use crate::validation::{self, FieldError};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Planned,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "PLANNED",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(FieldError::Invalid {
                field: "status",
                message: "Invalid project status",
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub budget: f64,
    pub deadline: DateTime<Utc>,
    pub status: ProjectStatus,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Compact project reference embedded in reminder listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
        }
    }
}

/// Listing row: the project plus its client's summary.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithClient {
    #[serde(flatten)]
    pub project: Project,
    pub client: Option<ClientSummary>,
}

/// GET /api/projects/:id payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub client: Option<Client>,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub budget: f64,
    pub deadline: DateTime<Utc>,
    pub status: ProjectStatus,
    pub client_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<ProjectStatus>,
    pub client_id: Option<Uuid>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(title) = self.title {
            project.title = title;
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(deadline) = self.deadline {
            project.deadline = deadline;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(client_id) = self.client_id {
            project.client_id = client_id;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub budget: Option<f64>,
    pub deadline: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<String>,
}

impl ProjectRequest {
    pub fn validate_new(self) -> Result<NewProject, FieldError> {
        let title = validation::required_text("title", self.title, "Title is required")?;

        let budget = self.budget.ok_or(FieldError::Required {
            field: "budget",
            message: "Budget is required",
        })?;
        let budget = validation::non_negative("budget", budget, "Budget must be a positive number")?;

        let deadline = validation::timestamp(
            "deadline",
            self.deadline.as_deref().unwrap_or_default(),
            "Invalid deadline date",
        )?;

        let status = self
            .status
            .as_deref()
            .map(ProjectStatus::from_str)
            .transpose()?
            .unwrap_or_default();

        let client_id = validation::uuid(
            "clientId",
            self.client_id.as_deref().unwrap_or_default(),
            "Invalid client ID",
        )?;

        Ok(NewProject {
            title,
            budget,
            deadline,
            status,
            client_id,
        })
    }

    pub fn validate_patch(self) -> Result<ProjectPatch, FieldError> {
        let title = validation::patch_text("title", self.title, "Title is required")?;
        let budget = self
            .budget
            .map(|b| validation::non_negative("budget", b, "Budget must be a positive number"))
            .transpose()?;
        let deadline = self
            .deadline
            .map(|d| validation::timestamp("deadline", &d, "Invalid deadline date"))
            .transpose()?;
        let status = self.status.as_deref().map(ProjectStatus::from_str).transpose()?;
        let client_id = self
            .client_id
            .map(|id| validation::uuid("clientId", &id, "Invalid client ID"))
            .transpose()?;

        Ok(ProjectPatch {
            title,
            budget,
            deadline,
            status,
            client_id,
        })
    }
}
