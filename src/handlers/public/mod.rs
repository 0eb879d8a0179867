// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus the service banner and health probe.

pub mod auth;
pub mod status;

pub use status::{health_get, root_get};
