pub mod client;
pub mod project;
pub mod reminder;
pub mod user;

pub use client::{Client, ClientDetail, ClientPatch, ClientSummary, NewClient};
pub use project::{
    NewProject, Project, ProjectDetail, ProjectFilter, ProjectPatch, ProjectStatus, ProjectSummary,
    ProjectWithClient,
};
pub use reminder::{NewReminder, Reminder, ReminderDetail, ReminderFilter, ReminderPatch, ReminderWithRefs};
pub use user::{NewUser, User, UserProfile};
