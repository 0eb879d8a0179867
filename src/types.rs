/// Shared types used across the codebase

/// Owned record kinds reachable through a scoped lookup.
/// Every kind carries the caller's `user_id` and is invisible to other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Client,
    Project,
    Reminder,
}

impl Resource {
    pub fn table(&self) -> &'static str {
        match self {
            Resource::Client => "clients",
            Resource::Project => "projects",
            Resource::Reminder => "reminders",
        }
    }

    /// Message used whenever a record is absent or owned by someone else.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Resource::Client => "Client not found",
            Resource::Project => "Project not found",
            Resource::Reminder => "Reminder not found",
        }
    }
}
