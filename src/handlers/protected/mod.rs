// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs after `jwt_auth_middleware` and receives the caller
// as `Extension<AuthUser>`. All reads and writes are scoped to that caller.
//
// Route Prefix: /api/*
// Middleware: JWT validation + account existence check

pub mod clients; // /api/clients
pub mod dashboard; // /api/dashboard
pub mod projects; // /api/projects
pub mod reminders; // /api/reminders
