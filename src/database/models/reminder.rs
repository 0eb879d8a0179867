use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Client, ClientSummary, Project, ProjectSummary};
use crate::validation::{self, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Reminder annotated with the summaries of whatever it references.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderWithRefs {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub client: Option<ClientSummary>,
    pub project: Option<ProjectSummary>,
}

/// GET /api/reminders/:id payload.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderDetail {
    #[serde(flatten)]
    pub reminder: Reminder,
    pub client: Option<Client>,
    pub project: Option<Project>,
}

/// Listing filter; every bound is optional and combined with AND.
/// `due_from`/`due_until` are both inclusive.
#[derive(Debug, Clone, Default)]
pub struct ReminderFilter {
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub completed: Option<bool>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_until: Option<DateTime<Utc>>,
}

impl ReminderFilter {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        self.client_id.map_or(true, |id| reminder.client_id == Some(id))
            && self.project_id.map_or(true, |id| reminder.project_id == Some(id))
            && self.completed.map_or(true, |c| reminder.completed == c)
            && self.due_from.map_or(true, |from| reminder.due_date >= from)
            && self.due_until.map_or(true, |until| reminder.due_date <= until)
    }
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub client_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
}

impl ReminderPatch {
    pub fn apply(self, reminder: &mut Reminder) {
        if let Some(title) = self.title {
            reminder.title = title;
        }
        if self.description.is_some() {
            reminder.description = self.description;
        }
        if let Some(due_date) = self.due_date {
            reminder.due_date = due_date;
        }
        if let Some(completed) = self.completed {
            reminder.completed = completed;
        }
        if self.client_id.is_some() {
            reminder.client_id = self.client_id;
        }
        if self.project_id.is_some() {
            reminder.project_id = self.project_id;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub client_id: Option<String>,
    pub project_id: Option<String>,
    pub completed: Option<bool>,
}

impl ReminderRequest {
    /// `completed` is ignored on create; new reminders always start open.
    pub fn validate_new(self) -> Result<NewReminder, FieldError> {
        let title = validation::required_text("title", self.title, "Title is required")?;
        let due_date = validation::timestamp(
            "dueDate",
            self.due_date.as_deref().unwrap_or_default(),
            "Invalid due date",
        )?;
        let (client_id, project_id) = parse_refs(self.client_id, self.project_id)?;

        Ok(NewReminder {
            title,
            description: self.description,
            due_date,
            client_id,
            project_id,
        })
    }

    pub fn validate_patch(self) -> Result<ReminderPatch, FieldError> {
        let title = validation::patch_text("title", self.title, "Title is required")?;
        let due_date = self
            .due_date
            .map(|d| validation::timestamp("dueDate", &d, "Invalid due date"))
            .transpose()?;
        let (client_id, project_id) = parse_refs(self.client_id, self.project_id)?;

        Ok(ReminderPatch {
            title,
            description: self.description,
            due_date,
            completed: self.completed,
            client_id,
            project_id,
        })
    }
}

fn parse_refs(
    client_id: Option<String>,
    project_id: Option<String>,
) -> Result<(Option<Uuid>, Option<Uuid>), FieldError> {
    let client_id = client_id
        .map(|id| validation::uuid("clientId", &id, "Invalid client ID"))
        .transpose()?;
    let project_id = project_id
        .map(|id| validation::uuid("projectId", &id, "Invalid project ID"))
        .transpose()?;
    Ok((client_id, project_id))
}

/// Query string accepted by GET /api/reminders.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderQuery {
    pub client_id: Option<String>,
    pub project_id: Option<String>,
    pub completed: Option<String>,
}

impl ReminderQuery {
    pub fn into_filter(self) -> Result<ReminderFilter, FieldError> {
        let (client_id, project_id) = parse_refs(self.client_id, self.project_id)?;
        let completed = match self.completed.as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(_) => {
                return Err(FieldError::Invalid {
                    field: "completed",
                    message: "completed must be true or false",
                })
            }
        };

        Ok(ReminderFilter {
            client_id,
            project_id,
            completed,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reminder(due_date: DateTime<Utc>, completed: bool) -> Reminder {
        Reminder {
            id: Uuid::new_v4(),
            title: "Follow up".into(),
            description: None,
            due_date,
            completed,
            client_id: None,
            project_id: None,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_window_is_inclusive() {
        let now = Utc::now();
        let filter = ReminderFilter {
            completed: Some(false),
            due_from: Some(now),
            due_until: Some(now + Duration::days(7)),
            ..Default::default()
        };

        assert!(filter.matches(&reminder(now, false)));
        assert!(filter.matches(&reminder(now + Duration::days(7), false)));
        assert!(!filter.matches(&reminder(now + Duration::days(7) + Duration::seconds(1), false)));
        assert!(!filter.matches(&reminder(now - Duration::seconds(1), false)));
        assert!(!filter.matches(&reminder(now + Duration::days(1), true)));
    }

    #[test]
    fn query_parses_completed_strictly() {
        let filter = ReminderQuery {
            completed: Some("true".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.completed, Some(true));

        let err = ReminderQuery {
            completed: Some("yes".into()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_err();
        assert_eq!(err.field(), "completed");
    }

    #[test]
    fn rejects_malformed_references() {
        let err = ReminderRequest {
            title: Some("Follow up".into()),
            due_date: Some("2030-01-01T00:00:00Z".into()),
            project_id: Some("abc".into()),
            ..Default::default()
        }
        .validate_new()
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid project ID");
    }

    #[test]
    fn patch_can_complete() {
        let mut r = reminder(Utc::now(), false);
        ReminderPatch {
            completed: Some(true),
            ..Default::default()
        }
        .apply(&mut r);
        assert!(r.completed);
        assert_eq!(r.title, "Follow up");
    }
}
