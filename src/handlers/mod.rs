// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth). The router in `server.rs` wires
// each tier and applies the authentication middleware to the protected one.

pub mod protected; // JWT authentication required (/api/*)
pub mod public; // No authentication required (/, /health, /api/auth/*)
