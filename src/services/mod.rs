// services/mod.rs - Business operations behind the HTTP handlers
//
// Each service owns a handle to the shared store and returns `ApiError` so
// handlers only translate between HTTP and domain types.

pub mod account_service;
pub mod client_service;
pub mod dashboard_service;
pub mod project_service;
pub mod reminder_service;

pub use account_service::{AccountService, Session};
pub use client_service::ClientService;
pub use dashboard_service::{DashboardService, DashboardStats};
pub use project_service::ProjectService;
pub use reminder_service::ReminderService;
