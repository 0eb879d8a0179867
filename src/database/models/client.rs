use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Project, Reminder};
use crate::validation::{self, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Compact client reference embedded in project and reminder listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Client> for ClientSummary {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            name: client.name.clone(),
            email: client.email.clone(),
        }
    }
}

/// GET /api/clients/:id payload.
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub projects: Vec<Project>,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub notes: Option<String>,
}

/// Absent fields stay untouched; `user_id` is not part of the patch at all.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl ClientPatch {
    pub fn apply(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if self.company.is_some() {
            client.company = self.company;
        }
        if self.notes.is_some() {
            client.notes = self.notes;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
}

impl ClientRequest {
    pub fn validate_new(self) -> Result<NewClient, FieldError> {
        let name = validation::required_text("name", self.name, "Name is required")?;
        let email = validation::email("email", &self.email.unwrap_or_default(), "Invalid email address")?;
        let phone = validation::required_text("phone", self.phone, "Phone number is required")?;

        Ok(NewClient {
            name,
            email,
            phone,
            company: self.company,
            notes: self.notes,
        })
    }

    pub fn validate_patch(self) -> Result<ClientPatch, FieldError> {
        let name = validation::patch_text("name", self.name, "Name is required")?;
        let email = self
            .email
            .map(|e| validation::email("email", &e, "Invalid email address"))
            .transpose()?;
        let phone = validation::patch_text("phone", self.phone, "Phone number is required")?;

        Ok(ClientPatch {
            name,
            email,
            phone,
            company: self.company,
            notes: self.notes,
        })
    }
}
